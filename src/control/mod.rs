//! Named, observable input values.
//!
//! A [`Control`] holds a current/previous value pair and notifies listeners
//! when `set_value` changes it. Every control shares one contract; what differs
//! per [`ControlKind`] is how input is coerced and when a change counts:
//!
//! | Kind                  | Value             | Change rule                                  |
//! |-----------------------|-------------------|----------------------------------------------|
//! | `Button` / `Key`      | scalar in `[0,1]` | numeric equality, plus pressed/released edges |
//! | `Float`               | scalar            | numeric equality, optional range clamp       |
//! | `Vec2` / `Vec3`       | vector            | component-wise equality                      |
//! | `Stick`               | vector in unit disk | as `Vec2`, after denoise + deadzone        |
//! | `Navigation` / `Wheel`| [`WheelDelta`]    | never suppressed                             |
//!
//! Controls are shared as `Rc<Control>` and mutated through `&self`; all state
//! lives behind a `RefCell` that is released before listeners run, so a
//! listener may read (or even drive) the control that notified it.
//!
//! ```
//! use inputmap::{Control, ControlValue};
//!
//! let space = Control::key("Space");
//! assert!(space.set_value(true, None));
//! assert!(space.is_pressed());
//! assert_eq!(space.value(), ControlValue::Scalar(1.0));
//! assert!(!space.set_value(true, None)); // unchanged, nothing emitted
//! ```

mod button;
mod navigation;
mod stick;

pub use navigation::NavigationGesture;

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::config::{
    ButtonSettings, FloatSettings, NavigationSettings, StickSettings, VectorSettings,
};
use crate::error::{InputError, Result};
use crate::event::{ControlEvent, ControlEventKind, NativeEvent};
use crate::eventbus::{EventBus, Listener, ListenerId};
use crate::filtered_listener::FilteredListener;
use crate::value::{ControlInput, ControlValue, Vec2, Vec3, WheelDelta};

/// Value semantics of a control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    /// Analog or digital button with a press threshold.
    Button(ButtonSettings),
    /// Keyboard key: a button that only stores `0.0` or `1.0`.
    Key(ButtonSettings),
    Float(FloatSettings),
    Vec2(VectorSettings),
    Vec3(VectorSettings),
    /// Analog stick: `Vec2` clamped to the unit disk, denoised, deadzoned.
    Stick(StickSettings),
    /// Wheel deltas plus the originating native event and gesture heuristics.
    Navigation(NavigationSettings),
    Wheel,
}

impl ControlKind {
    pub fn key() -> Self {
        ControlKind::Key(ButtonSettings::default())
    }

    pub fn button() -> Self {
        ControlKind::Button(ButtonSettings::default())
    }

    /// Short lowercase name, used in logs and snapshots.
    pub fn label(&self) -> &'static str {
        match self {
            ControlKind::Button(_) => "button",
            ControlKind::Key(_) => "key",
            ControlKind::Float(_) => "float",
            ControlKind::Vec2(_) => "vec2",
            ControlKind::Vec3(_) => "vec3",
            ControlKind::Stick(_) => "stick",
            ControlKind::Navigation(_) => "navigation",
            ControlKind::Wheel => "wheel",
        }
    }

    /// The value a fresh or reset control holds.
    pub fn default_value(&self) -> ControlValue {
        match self {
            ControlKind::Button(_) | ControlKind::Key(_) | ControlKind::Float(_) => {
                ControlValue::Scalar(0.0)
            }
            ControlKind::Vec2(_) | ControlKind::Stick(_) => ControlValue::Vec2(Vec2::zeros()),
            ControlKind::Vec3(_) => ControlValue::Vec3(Vec3::zeros()),
            ControlKind::Navigation(_) | ControlKind::Wheel => {
                ControlValue::Delta(WheelDelta::default())
            }
        }
    }

    /// Button-like kinds derive a pressed state from their value.
    pub fn is_button_like(&self) -> bool {
        matches!(self, ControlKind::Button(_) | ControlKind::Key(_))
    }

    /// Wheel-like kinds emit on every `set_value`, equal or not.
    pub fn emits_repeats(&self) -> bool {
        matches!(self, ControlKind::Navigation(_) | ControlKind::Wheel)
    }

    /// Convert loosely typed input into this kind's canonical value.
    fn coerce(&self, input: &ControlInput) -> ControlValue {
        match self {
            ControlKind::Button(settings) => ControlValue::Scalar(button::coerce(input, settings)),
            ControlKind::Key(settings) => {
                ControlValue::Scalar(button::coerce(input, &settings.digital()))
            }
            ControlKind::Float(settings) => {
                let v = input.to_scalar();
                ControlValue::Scalar(if settings.normalize {
                    settings.range.clamp(v)
                } else {
                    v
                })
            }
            ControlKind::Vec2(settings) => {
                let v = input.to_vec2();
                ControlValue::Vec2(if settings.normalize {
                    v.map(|c| settings.range.clamp(c))
                } else {
                    v
                })
            }
            ControlKind::Vec3(settings) => {
                let v = input.to_vec3();
                ControlValue::Vec3(if settings.normalize {
                    v.map(|c| settings.range.clamp(c))
                } else {
                    v
                })
            }
            ControlKind::Stick(settings) => {
                ControlValue::Vec2(stick::filter(input.to_vec2(), settings))
            }
            ControlKind::Navigation(_) | ControlKind::Wheel => {
                ControlValue::Delta(input.to_delta())
            }
        }
    }
}

#[derive(Debug, Clone)]
struct ControlState {
    value: ControlValue,
    old_value: Option<ControlValue>,
    pressed: bool,
    /// Navigation only: the native event behind the current value.
    native: Option<NativeEvent>,
}

/// A single named input value with change notification.
pub struct Control {
    name: String,
    device: OnceCell<String>,
    kind: ControlKind,
    state: RefCell<ControlState>,
    events: EventBus<ControlEvent>,
}

impl Control {
    /// Create a standalone control. Devices adopt controls via
    /// [`DeviceCore::add_control`](crate::device::DeviceCore::add_control).
    pub fn new(name: impl Into<String>, kind: ControlKind) -> Rc<Self> {
        Self::build(name.into(), kind, OnceCell::new())
    }

    /// A control created by and owned by `device`.
    pub(crate) fn owned_by(name: impl Into<String>, kind: ControlKind, device: &str) -> Rc<Self> {
        Self::build(name.into(), kind, OnceCell::from(device.to_owned()))
    }

    fn build(name: String, kind: ControlKind, device: OnceCell<String>) -> Rc<Self> {
        let value = kind.default_value();
        Rc::new(Self {
            name,
            device,
            kind,
            state: RefCell::new(ControlState {
                value,
                old_value: None,
                pressed: false,
                native: None,
            }),
            events: EventBus::new(),
        })
    }

    pub fn button(name: impl Into<String>) -> Rc<Self> {
        Self::new(name, ControlKind::button())
    }

    pub fn key(name: impl Into<String>) -> Rc<Self> {
        Self::new(name, ControlKind::key())
    }

    pub fn float(name: impl Into<String>, settings: FloatSettings) -> Rc<Self> {
        Self::new(name, ControlKind::Float(settings))
    }

    pub fn vec2(name: impl Into<String>) -> Rc<Self> {
        Self::new(name, ControlKind::Vec2(VectorSettings::default()))
    }

    pub fn vec3(name: impl Into<String>) -> Rc<Self> {
        Self::new(name, ControlKind::Vec3(VectorSettings::default()))
    }

    pub fn stick(name: impl Into<String>, settings: StickSettings) -> Rc<Self> {
        Self::new(name, ControlKind::Stick(settings))
    }

    pub fn navigation(name: impl Into<String>) -> Rc<Self> {
        Self::new(name, ControlKind::Navigation(NavigationSettings::default()))
    }

    pub fn wheel(name: impl Into<String>) -> Rc<Self> {
        Self::new(name, ControlKind::Wheel)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the owning device, `None` for standalone controls.
    pub fn device(&self) -> Option<&str> {
        self.device.get().map(String::as_str)
    }

    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    /// Record the owning device. A control belongs to at most one device.
    pub(crate) fn attach_to(&self, device: &str) -> Result<()> {
        let owner = self.device.get_or_init(|| device.to_owned());
        if owner != device {
            return Err(InputError::ControlOwned {
                control: self.name.clone(),
                owner: owner.clone(),
            });
        }
        Ok(())
    }

    /// Current value (a copy).
    pub fn value(&self) -> ControlValue {
        self.state.borrow().value
    }

    /// Value before the most recent change; `None` until the first change.
    pub fn old_value(&self) -> Option<ControlValue> {
        self.state.borrow().old_value
    }

    /// Scalar value, `0.0` for non-scalar kinds.
    pub fn scalar(&self) -> f32 {
        self.value().as_scalar().unwrap_or(0.0)
    }

    /// 2D value, zero for kinds that are not 2D.
    pub fn vector2(&self) -> Vec2 {
        self.value().as_vec2().unwrap_or_else(Vec2::zeros)
    }

    /// 3D value, zero for kinds that are not 3D.
    pub fn vector3(&self) -> Vec3 {
        self.value().as_vec3().unwrap_or_else(Vec3::zeros)
    }

    /// Wheel deltas, zero for kinds that are not wheel-like.
    pub fn delta(&self) -> WheelDelta {
        self.value().as_delta().unwrap_or_default()
    }

    /// Pressed state of button-like controls; always `false` otherwise.
    pub fn is_pressed(&self) -> bool {
        self.state.borrow().pressed
    }

    /// Assign a new value. Returns whether anything was emitted.
    ///
    /// Input is coerced per kind (malformed numbers become `0.0`). If the coerced
    /// value equals the current one nothing changes and `false` is returned,
    /// except for wheel-like kinds which always emit. Otherwise `Updated` is
    /// emitted, followed by `Pressed`/`Released` when a button crosses its threshold.
    pub fn set_value(&self, input: impl Into<ControlInput>, native: Option<&NativeEvent>) -> bool {
        let next = self.kind.coerce(&input.into());
        self.assign(next, native)
    }

    /// Return to the kind's default value through the normal change path.
    pub fn reset(&self) -> bool {
        self.assign(self.kind.default_value(), None)
    }

    fn assign(&self, next: ControlValue, native: Option<&NativeEvent>) -> bool {
        let (old, edge) = {
            let mut state = self.state.borrow_mut();
            if state.value == next && !self.kind.emits_repeats() {
                return false;
            }
            let old = std::mem::replace(&mut state.value, next);
            state.old_value = Some(old);
            if matches!(self.kind, ControlKind::Navigation(_)) {
                state.native = native.cloned();
            }
            (old, button::edge(&self.kind, &mut state))
        };

        log::trace!(
            "{}/{}: {:?} -> {:?}",
            self.device().unwrap_or("-"),
            self.name,
            old,
            next
        );

        self.events.emit(&ControlEvent::Updated {
            value: next,
            old_value: old,
            native: native.cloned(),
        });
        match edge {
            Some(true) => self.events.emit(&ControlEvent::Pressed {
                native: native.cloned(),
            }),
            Some(false) => self.events.emit(&ControlEvent::Released),
            None => {}
        }
        true
    }

    /// Subscribe to one kind of notification.
    pub fn on(
        &self,
        kind: ControlEventKind,
        listener: impl Listener<ControlEvent> + 'static,
    ) -> ListenerId {
        self.events.add_listener(FilteredListener::new(
            move |event: &ControlEvent| event.kind() == kind,
            listener,
        ))
    }

    /// Subscribe to every notification.
    pub fn on_any(&self, listener: impl Listener<ControlEvent> + 'static) -> ListenerId {
        self.events.add_listener(listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("device", &self.device.get())
            .field("kind", &self.kind.label())
            .field("value", &state.value)
            .field("pressed", &state.pressed)
            .finish()
    }
}
