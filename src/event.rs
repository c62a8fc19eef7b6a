//! Events flowing through the crate.
//!
//! Three layers, leaf to root:
//! - [`NativeEvent`]: what the host surface reports (key, pointer, wheel, gamepad, blur).
//!   Every payload field is optional on the wire; absent fields read as zero/false/none.
//! - [`ControlEvent`]: what a single control emits when `set_value` changes it.
//! - [`DeviceEvent`]: what a device emits, either a normalized snapshot of the native
//!   event it handled or a relayed [`ControlNotification`].
//!
//! For one native event the order is always: control update, control notification,
//! relayed device notification (binders resolve here), then the device-level event.

use serde::{Deserialize, Serialize};

use crate::value::{ControlValue, Vec2, WheelDelta};

/// Modifier key state attached to native events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::default()
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }
}

/// Native key event: a layout-independent `code` plus the display `key` label.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardEvent {
    /// Physical key, e.g. `"KeyW"`, `"Space"`, `"ShiftLeft"`.
    pub code: Option<String>,
    /// Display label, e.g. `"w"`, `" "`, `"Shift"`.
    pub key: Option<String>,
    pub modifiers: Modifiers,
    /// Auto-repeat from a held key.
    pub repeat: bool,
}

impl KeyboardEvent {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Name of the control this event drives: `code`, falling back to `key`.
    pub fn control_name(&self) -> Option<&str> {
        [self.code.as_deref(), self.key.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }
}

/// Native pointer event (down, up, move).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerEvent {
    /// Button index: 0 left, 1 middle, 2 right, 3 back, 4 forward.
    pub button: Option<u16>,
    pub x: f32,
    pub y: f32,
    pub movement_x: f32,
    pub movement_y: f32,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_button(mut self, button: u16) -> Self {
        self.button = Some(button);
        self
    }

    pub fn with_movement(mut self, dx: f32, dy: f32) -> Self {
        self.movement_x = dx;
        self.movement_y = dy;
        self
    }
}

/// Native wheel or trackpad gesture event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelEvent {
    pub delta_x: f32,
    pub delta_y: f32,
    pub delta_z: f32,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self {
            delta_x,
            delta_y,
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Native gamepad state report for one slot (standard mapping).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadEvent {
    pub index: u32,
    pub disconnected: bool,
    /// Button values in `[0, 1]`, indexed per the standard layout.
    pub buttons: Vec<f32>,
    /// Axis values in `[-1, 1]`: LX, LY, RX, RY, then extras.
    pub axes: Vec<f32>,
}

/// A raw event from the host surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NativeEvent {
    KeyDown(KeyboardEvent),
    KeyUp(KeyboardEvent),
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    PointerMove(PointerEvent),
    Wheel(WheelEvent),
    Gamepad(GamepadEvent),
    /// The host surface lost input focus.
    Blur,
}

/// Discriminant of [`NativeEvent`], used when installing listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NativeEventKind {
    KeyDown,
    KeyUp,
    PointerDown,
    PointerUp,
    PointerMove,
    Wheel,
    Gamepad,
    Blur,
}

impl NativeEvent {
    pub fn kind(&self) -> NativeEventKind {
        match self {
            NativeEvent::KeyDown(_) => NativeEventKind::KeyDown,
            NativeEvent::KeyUp(_) => NativeEventKind::KeyUp,
            NativeEvent::PointerDown(_) => NativeEventKind::PointerDown,
            NativeEvent::PointerUp(_) => NativeEventKind::PointerUp,
            NativeEvent::PointerMove(_) => NativeEventKind::PointerMove,
            NativeEvent::Wheel(_) => NativeEventKind::Wheel,
            NativeEvent::Gamepad(_) => NativeEventKind::Gamepad,
            NativeEvent::Blur => NativeEventKind::Blur,
        }
    }

    /// Modifier state, or none for events that carry no modifiers.
    pub fn modifiers(&self) -> Modifiers {
        match self {
            NativeEvent::KeyDown(e) | NativeEvent::KeyUp(e) => e.modifiers,
            NativeEvent::PointerDown(e)
            | NativeEvent::PointerUp(e)
            | NativeEvent::PointerMove(e) => e.modifiers,
            NativeEvent::Wheel(e) => e.modifiers,
            NativeEvent::Gamepad(_) | NativeEvent::Blur => Modifiers::none(),
        }
    }
}

/// Notification emitted by a control.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    /// The value changed (always emitted by wheel/navigation controls).
    Updated {
        value: ControlValue,
        old_value: ControlValue,
        native: Option<NativeEvent>,
    },
    /// A button-like control crossed its press threshold upward.
    Pressed { native: Option<NativeEvent> },
    /// A button-like control crossed its press threshold downward.
    Released,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlEventKind {
    Updated,
    Pressed,
    Released,
}

impl ControlEvent {
    pub fn kind(&self) -> ControlEventKind {
        match self {
            ControlEvent::Updated { .. } => ControlEventKind::Updated,
            ControlEvent::Pressed { .. } => ControlEventKind::Pressed,
            ControlEvent::Released => ControlEventKind::Released,
        }
    }
}

/// A control notification relayed by its owning device.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlNotification {
    pub device: String,
    pub control: String,
    pub event: ControlEvent,
}

/// Normalized key event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KeySnapshot {
    /// Control name the event was routed to.
    pub code: String,
    pub key: Option<String>,
    pub modifiers: Modifiers,
    pub repeat: bool,
}

/// Normalized pointer event. `position` and `movement` are copies.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PointerSnapshot {
    /// Button control name, for down/up events.
    pub button: Option<String>,
    pub position: Vec2,
    pub movement: Vec2,
    pub modifiers: Modifiers,
}

/// Normalized wheel event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WheelSnapshot {
    pub delta: WheelDelta,
    pub modifiers: Modifiers,
}

/// Device-level notification.
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceEvent {
    KeyDown(KeySnapshot),
    KeyUp(KeySnapshot),
    MouseDown(PointerSnapshot),
    MouseUp(PointerSnapshot),
    MouseMove(PointerSnapshot),
    Wheel(WheelSnapshot),
    GamepadConnected { index: u32 },
    GamepadDisconnected { index: u32 },
    /// Focus was lost and every pressed control has been released.
    Blur,
    /// One of the device's controls emitted.
    Control(ControlNotification),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceEventKind {
    KeyDown,
    KeyUp,
    MouseDown,
    MouseUp,
    MouseMove,
    Wheel,
    GamepadConnected,
    GamepadDisconnected,
    Blur,
    Control,
}

impl DeviceEvent {
    pub fn kind(&self) -> DeviceEventKind {
        match self {
            DeviceEvent::KeyDown(_) => DeviceEventKind::KeyDown,
            DeviceEvent::KeyUp(_) => DeviceEventKind::KeyUp,
            DeviceEvent::MouseDown(_) => DeviceEventKind::MouseDown,
            DeviceEvent::MouseUp(_) => DeviceEventKind::MouseUp,
            DeviceEvent::MouseMove(_) => DeviceEventKind::MouseMove,
            DeviceEvent::Wheel(_) => DeviceEventKind::Wheel,
            DeviceEvent::GamepadConnected { .. } => DeviceEventKind::GamepadConnected,
            DeviceEvent::GamepadDisconnected { .. } => DeviceEventKind::GamepadDisconnected,
            DeviceEvent::Blur => DeviceEventKind::Blur,
            DeviceEvent::Control(_) => DeviceEventKind::Control,
        }
    }

    /// The relayed control notification, if this is one.
    pub fn as_control(&self) -> Option<&ControlNotification> {
        match self {
            DeviceEvent::Control(n) => Some(n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_read_as_defaults() {
        let ev: NativeEvent = serde_json::from_str(r#"{"type":"keydown","code":"Space"}"#).unwrap();
        let NativeEvent::KeyDown(key) = &ev else {
            panic!("expected keydown, got {ev:?}");
        };
        assert_eq!(key.control_name(), Some("Space"));
        assert_eq!(key.modifiers, Modifiers::none());
        assert!(!key.repeat);

        let ev: NativeEvent = serde_json::from_str(r#"{"type":"wheel","delta_y":10}"#).unwrap();
        assert_eq!(ev, NativeEvent::Wheel(WheelEvent::new(0.0, 10.0)));

        let ev: NativeEvent = serde_json::from_str(r#"{"type":"gamepad"}"#).unwrap();
        assert_eq!(ev, NativeEvent::Gamepad(GamepadEvent::default()));

        let ev: NativeEvent = serde_json::from_str(r#"{"type":"blur"}"#).unwrap();
        assert_eq!(ev.kind(), NativeEventKind::Blur);
    }

    #[test]
    fn control_name_falls_back_to_key_label() {
        let ev = KeyboardEvent {
            code: Some(String::new()),
            key: Some("a".into()),
            ..KeyboardEvent::default()
        };
        assert_eq!(ev.control_name(), Some("a"));
        assert_eq!(KeyboardEvent::default().control_name(), None);
    }

    #[test]
    fn modifiers_are_read_from_any_payload() {
        let ev = NativeEvent::Wheel(WheelEvent::new(0.0, 1.0).with_modifiers(Modifiers::ctrl()));
        assert!(ev.modifiers().ctrl);
        assert_eq!(NativeEvent::Blur.modifiers(), Modifiers::none());
    }
}
