use std::ops::Deref;

use crate::config::{InputConfig, VectorSettings};
use crate::control::ControlKind;
use crate::device::{Device, DeviceCore, DeviceDriver, Modality};
use crate::event::{
    DeviceEvent, NativeEvent, NativeEventKind, PointerEvent, PointerSnapshot, WheelEvent,
    WheelSnapshot,
};
use crate::value::{Vec2, WheelDelta};

pub const POSITION: &str = "position";
pub const MOVEMENT: &str = "movement";
pub const WHEEL: &str = "wheel";
pub const NAVIGATION: &str = "navigation";

/// Control name for a pointer button index.
pub fn button_name(index: u16) -> String {
    match index {
        0 => "left".into(),
        1 => "middle".into(),
        2 => "right".into(),
        3 => "back".into(),
        4 => "forward".into(),
        n => format!("button{n}"),
    }
}

/// Pointer position and motion, wheel deltas, and digital buttons.
#[derive(Debug, Default)]
pub struct MouseDriver;

impl MouseDriver {
    fn track(device: &DeviceCore, pointer: &PointerEvent, native: &NativeEvent) -> PointerSnapshot {
        let position = Vec2::new(pointer.x, pointer.y);
        let movement = Vec2::new(pointer.movement_x, pointer.movement_y);
        if let Some(c) = device.control(POSITION) {
            c.set_value(position, Some(native));
        }
        if let Some(c) = device.control(MOVEMENT) {
            c.set_value(movement, Some(native));
        }
        PointerSnapshot {
            button: None,
            position,
            movement,
            modifiers: pointer.modifiers,
        }
    }

    fn scroll(device: &DeviceCore, wheel: &WheelEvent, native: &NativeEvent) -> WheelSnapshot {
        for name in [WHEEL, NAVIGATION] {
            if let Some(c) = device.control(name) {
                c.set_value(wheel, Some(native));
            }
        }
        WheelSnapshot {
            delta: WheelDelta::from(wheel),
            modifiers: wheel.modifiers,
        }
    }
}

impl DeviceDriver for MouseDriver {
    fn modality(&self) -> Modality {
        Modality::Mouse
    }

    fn native_kinds(&self) -> &'static [NativeEventKind] {
        &[
            NativeEventKind::PointerDown,
            NativeEventKind::PointerUp,
            NativeEventKind::PointerMove,
            NativeEventKind::Wheel,
        ]
    }

    fn install_controls(&self, device: &DeviceCore) {
        let vector = || ControlKind::Vec2(VectorSettings::default());
        device.get_or_create_control(POSITION, vector());
        device.get_or_create_control(MOVEMENT, vector());
        device.get_or_create_control(WHEEL, ControlKind::Wheel);
        device.get_or_create_control(
            NAVIGATION,
            ControlKind::Navigation(device.config().navigation.clone()),
        );
    }

    fn handle(&self, device: &DeviceCore, event: &NativeEvent) {
        match event {
            NativeEvent::PointerDown(pointer) | NativeEvent::PointerUp(pointer) => {
                let down = matches!(event, NativeEvent::PointerDown(_));
                let mut snapshot = Self::track(device, pointer, event);
                let name = button_name(pointer.button.unwrap_or(0));
                let button = device.get_or_create_control(
                    &name,
                    ControlKind::Button(device.config().button.digital()),
                );
                button.set_value(down, Some(event));
                snapshot.button = Some(name);
                device.emit(&if down {
                    DeviceEvent::MouseDown(snapshot)
                } else {
                    DeviceEvent::MouseUp(snapshot)
                });
            }
            NativeEvent::PointerMove(pointer) => {
                let snapshot = Self::track(device, pointer, event);
                device.emit(&DeviceEvent::MouseMove(snapshot));
            }
            NativeEvent::Wheel(wheel) => {
                let snapshot = Self::scroll(device, wheel, event);
                device.emit(&DeviceEvent::Wheel(snapshot));
            }
            _ => {}
        }
    }
}

/// Mouse device with pointer-oriented queries.
#[derive(Clone, Debug)]
pub struct Mouse {
    device: Device,
}

impl Mouse {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &InputConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: &InputConfig) -> Self {
        Self {
            device: Device::new(name, MouseDriver, config),
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn into_device(self) -> Device {
        self.device
    }

    /// Names of held buttons, sorted.
    pub fn pressed_buttons(&self) -> Vec<String> {
        self.device.pressed()
    }

    pub fn is_button_pressed(&self, name: &str) -> bool {
        self.device.is_pressed(name)
    }

    /// Last pointer position (a copy).
    pub fn position(&self) -> Vec2 {
        self.vector(POSITION)
    }

    /// Last pointer movement (a copy).
    pub fn movement(&self) -> Vec2 {
        self.vector(MOVEMENT)
    }

    fn vector(&self, name: &str) -> Vec2 {
        self.device
            .control(name)
            .map(|c| c.vector2())
            .unwrap_or_else(Vec2::zeros)
    }
}

impl Deref for Mouse {
    type Target = Device;

    fn deref(&self) -> &Device {
        &self.device
    }
}

impl From<Mouse> for Device {
    fn from(value: Mouse) -> Self {
        value.device
    }
}
