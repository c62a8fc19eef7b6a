//! Synchronous listener registry.
//!
//! [`EventBus`] is the observer list behind every control, device and
//! [`VirtualHost`](crate::backends::virtual_input::VirtualHost). Delivery happens
//! on the caller's stack, in registration order. Listeners may add or remove
//! listeners while an event is being delivered: a removed listener is not called
//! for the rest of that delivery, an added one starts with the next `emit`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Handle returned by [`EventBus::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Trait for reacting to events delivered by an [`EventBus`].
pub trait Listener<E> {
    fn on_event(&self, event: &E);
}

impl<E, F: Fn(&E)> Listener<E> for F {
    fn on_event(&self, event: &E) {
        self(event)
    }
}

/// Listener plus its mute flag.
struct ListenerEntry<E> {
    listener: Rc<dyn Listener<E>>,
    enabled: bool,
}

pub struct EventBus<E> {
    next_id: Cell<u64>,
    listeners: RefCell<BTreeMap<ListenerId, ListenerEntry<E>>>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            listeners: RefCell::new(BTreeMap::new()),
        }
    }

    /// Registers a listener; it receives every event emitted from now on.
    pub fn add_listener(&self, listener: impl Listener<E> + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(
            id,
            ListenerEntry {
                listener: Rc::new(listener),
                enabled: true,
            },
        );
        id
    }

    /// Enables a previously registered listener.
    pub fn enable(&self, id: ListenerId) {
        if let Some(entry) = self.listeners.borrow_mut().get_mut(&id) {
            entry.enabled = true;
        }
    }

    /// Disables (mutes) a listener without removing it.
    pub fn disable(&self, id: ListenerId) {
        if let Some(entry) = self.listeners.borrow_mut().get_mut(&id) {
            entry.enabled = false;
        }
    }

    /// Unregisters a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Emits one event to all enabled listeners.
    pub fn emit(&self, event: &E) {
        let ids: Vec<ListenerId> = self.listeners.borrow().keys().copied().collect();
        for id in ids {
            // Re-check each time: an earlier listener may have removed or muted this one.
            let listener = match self.listeners.borrow().get(&id) {
                Some(entry) if entry.enabled => Rc::clone(&entry.listener),
                _ => continue,
            };
            listener.on_event(event);
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Box<dyn Fn(&u32)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |tag: &'static str| -> Box<dyn Fn(&u32)> {
            let sink = Rc::clone(&sink);
            Box::new(move |v: &u32| sink.borrow_mut().push(format!("{tag}:{v}")))
        };
        (log, make)
    }

    #[test]
    fn delivers_in_registration_order() {
        let bus = EventBus::<u32>::new();
        let (log, make) = recorder();
        bus.add_listener(make("a"));
        bus.add_listener(make("b"));
        bus.emit(&1);
        assert_eq!(*log.borrow(), vec!["a:1", "b:1"]);
    }

    #[test]
    fn disabled_listeners_are_skipped_until_enabled() {
        let bus = EventBus::<u32>::new();
        let (log, make) = recorder();
        let id = bus.add_listener(make("a"));
        bus.disable(id);
        bus.emit(&1);
        bus.enable(id);
        bus.emit(&2);
        assert_eq!(*log.borrow(), vec!["a:2"]);
    }

    #[test]
    fn removal_during_emit_takes_effect_immediately() {
        let bus = Rc::new(EventBus::<u32>::new());
        let (log, make) = recorder();
        let victim = Rc::new(Cell::new(None));
        {
            let bus_ref = Rc::downgrade(&bus);
            let victim = Rc::clone(&victim);
            bus.add_listener(move |_: &u32| {
                if let (Some(bus), Some(id)) = (bus_ref.upgrade(), victim.get()) {
                    bus.remove_listener(id);
                }
            });
        }
        victim.set(Some(bus.add_listener(make("victim"))));
        bus.emit(&1);
        assert!(log.borrow().is_empty());
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn listener_added_during_emit_waits_for_next_emit() {
        let bus = Rc::new(EventBus::<u32>::new());
        let (log, make) = recorder();
        let make = Rc::new(make);
        {
            let bus_ref = Rc::downgrade(&bus);
            let make = Rc::clone(&make);
            let added = Cell::new(false);
            bus.add_listener(move |_: &u32| {
                if !added.replace(true) {
                    if let Some(bus) = bus_ref.upgrade() {
                        bus.add_listener((*make)("late"));
                    }
                }
            });
        }
        bus.emit(&1);
        bus.emit(&2);
        assert_eq!(*log.borrow(), vec!["late:2"]);
    }

    #[test]
    fn remove_reports_unknown_ids() {
        let bus = EventBus::<u32>::new();
        let id = bus.add_listener(|_: &u32| {});
        assert!(bus.remove_listener(id));
        assert!(!bus.remove_listener(id));
        assert!(bus.is_empty());
    }
}
