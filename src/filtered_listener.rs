use crate::eventbus::Listener;

/// Wraps a listener and forwards only events accepted by a predicate.
pub struct FilteredListener<E> {
    predicate: Box<dyn Fn(&E) -> bool>,
    inner: Box<dyn Listener<E>>,
}

impl<E> FilteredListener<E> {
    pub fn new(
        predicate: impl Fn(&E) -> bool + 'static,
        inner: impl Listener<E> + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner: Box::new(inner),
        }
    }
}

impl<E> Listener<E> for FilteredListener<E> {
    fn on_event(&self, event: &E) {
        if (self.predicate)(event) {
            self.inner.on_event(event);
        }
    }
}
