//! Device drivers and native event sources.
//!
//! A [`HostEventSource`] is whatever owns the native event loop (a window, a
//! DOM-like surface, a test harness). Devices install one listener per
//! [`NativeEventKind`] they care about on [`Device::observe`](crate::device::DeviceCore::observe)
//! and remove them again on `unobserve`.
//!
//! Drivers turn native events into control updates for one modality:
//! - [`keyboard`]: one key control per physical key code
//! - [`mouse`]: position, movement, wheel, navigation and button controls
//! - [`gamepad`]: standard-mapping buttons, two sticks and extra axes
//!
//! [`virtual_input::VirtualHost`] is an in-process source for tests, demos and
//! hosts that prefer to push events by hand.

use crate::event::{NativeEvent, NativeEventKind};
use crate::eventbus::ListenerId;

pub mod gamepad;
pub mod keyboard;
pub mod mouse;
pub mod virtual_input;

pub use gamepad::{Gamepad, GamepadDriver};
pub use keyboard::{Keyboard, KeyboardDriver};
pub use mouse::{Mouse, MouseDriver};
pub use virtual_input::VirtualHost;

/// Callback installed on a host source.
pub type NativeHandler = Box<dyn Fn(&NativeEvent)>;

/// The host side of listener installation.
pub trait HostEventSource {
    /// Install `handler` for events of `kind`.
    fn add_listener(&self, kind: NativeEventKind, handler: NativeHandler) -> ListenerId;

    /// Remove a handler installed by [`add_listener`](Self::add_listener).
    fn remove_listener(&self, id: ListenerId) -> bool;
}
