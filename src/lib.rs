//! inputmap: named, observable input controls and action bindings.
//!
//! Raw host events (keys, pointer, wheel/trackpad, gamepad reports) flow one way:
//!
//! ```text
//! NativeEvent ─▶ Device (driver) ─▶ Control::set_value ─▶ ControlEvent
//!                                                      └▶ DeviceEvent::Control ─▶ Binder ─▶ ActionDispatcher
//! ```
//!
//! Everything is single-threaded and synchronous: for one native event the
//! control update, its notifications, binding resolution and action dispatch
//! all complete before the host callback returns.
//!
//! # Example
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use inputmap::backends::{Keyboard, VirtualHost};
//! use inputmap::{Binder, Binding, BindingEvent};
//!
//! let host = Rc::new(VirtualHost::new());
//! let keyboard = Keyboard::new("keyboard");
//! keyboard.observe(host.clone());
//!
//! let fired = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&fired);
//! let binder = Binder::new(move |_: Option<&str>, action: &str| {
//!     sink.borrow_mut().push(action.to_owned())
//! });
//! binder.observe(&keyboard);
//! binder
//!     .add_binding(Binding::composite(
//!         "save",
//!         "keyboard",
//!         ["ControlLeft", "KeyS"],
//!         BindingEvent::Pressed,
//!     ))
//!     .unwrap();
//!
//! host.key_down("ControlLeft");
//! host.key_down("KeyS");
//! assert_eq!(*fired.borrow(), vec!["save"]);
//!
//! host.blur();
//! assert!(keyboard.pressed_keys().is_empty());
//! ```

pub mod backends;
pub mod binder;
pub mod binding;
pub mod config;
pub mod control;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod logger;
pub mod manager;
pub mod snapshot;
pub mod value;

pub use binder::{ActionDispatcher, Binder, BindingId};
pub use binding::{Binding, BindingControls, BindingEvent, BindingProfile};
pub use config::InputConfig;
pub use control::{Control, ControlKind, NavigationGesture};
pub use device::{Device, DeviceCore, DeviceDriver, DeviceEventFilter, Modality, WeakDevice};
pub use error::{InputError, Result};
pub use event::{ControlEvent, ControlEventKind, DeviceEvent, DeviceEventKind, NativeEvent};
pub use eventbus::{EventBus, Listener, ListenerId};
pub use logger::DeviceLogger;
pub use manager::DeviceManager;
pub use snapshot::Snapshot;
pub use value::{ControlInput, ControlValue, Vec2, Vec3, WheelDelta};
