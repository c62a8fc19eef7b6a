use crate::backends::{HostEventSource, NativeHandler};
use crate::event::{
    GamepadEvent, KeyboardEvent, NativeEvent, NativeEventKind, PointerEvent, WheelEvent,
};
use crate::eventbus::{EventBus, ListenerId};
use crate::filtered_listener::FilteredListener;

/// In-process event source: every fed event is delivered synchronously to the
/// handlers installed for its kind.
#[derive(Debug, Default)]
pub struct VirtualHost {
    listeners: EventBus<NativeEvent>,
}

impl VirtualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a raw native event.
    pub fn feed(&self, event: NativeEvent) {
        log::trace!("virtual host: {:?}", event.kind());
        self.listeners.emit(&event);
    }

    pub fn key_down(&self, code: &str) {
        self.feed(NativeEvent::KeyDown(KeyboardEvent::new(code)));
    }

    pub fn key_up(&self, code: &str) {
        self.feed(NativeEvent::KeyUp(KeyboardEvent::new(code)));
    }

    pub fn pointer_down(&self, button: u16, x: f32, y: f32) {
        self.feed(NativeEvent::PointerDown(PointerEvent::at(x, y).with_button(button)));
    }

    pub fn pointer_up(&self, button: u16, x: f32, y: f32) {
        self.feed(NativeEvent::PointerUp(PointerEvent::at(x, y).with_button(button)));
    }

    pub fn pointer_move(&self, x: f32, y: f32, dx: f32, dy: f32) {
        self.feed(NativeEvent::PointerMove(PointerEvent::at(x, y).with_movement(dx, dy)));
    }

    pub fn wheel(&self, delta_x: f32, delta_y: f32) {
        self.feed(NativeEvent::Wheel(WheelEvent::new(delta_x, delta_y)));
    }

    pub fn gamepad(&self, event: GamepadEvent) {
        self.feed(NativeEvent::Gamepad(event));
    }

    /// Simulate the host surface losing focus.
    pub fn blur(&self) {
        self.feed(NativeEvent::Blur);
    }

    /// Number of installed handlers.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl HostEventSource for VirtualHost {
    fn add_listener(&self, kind: NativeEventKind, handler: NativeHandler) -> ListenerId {
        self.listeners.add_listener(FilteredListener::new(
            move |event: &NativeEvent| event.kind() == kind,
            handler,
        ))
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove_listener(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_only_installed_kinds() {
        let host = VirtualHost::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = host.add_listener(
            NativeEventKind::KeyDown,
            Box::new(move |e: &NativeEvent| sink.borrow_mut().push(e.kind())),
        );

        host.key_down("KeyA");
        host.key_up("KeyA");
        host.wheel(0.0, 1.0);
        assert_eq!(*seen.borrow(), vec![NativeEventKind::KeyDown]);

        assert!(host.remove_listener(id));
        host.key_down("KeyA");
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(host.listener_count(), 0);
    }
}
