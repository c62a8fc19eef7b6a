use std::ops::Deref;
use std::rc::Rc;

use crate::config::InputConfig;
use crate::control::{Control, ControlKind};
use crate::device::{Device, DeviceCore, DeviceDriver, Modality};
use crate::event::{DeviceEvent, KeySnapshot, NativeEvent, NativeEventKind};

/// One digital key control per physical key, created on first use.
#[derive(Debug, Default)]
pub struct KeyboardDriver;

impl DeviceDriver for KeyboardDriver {
    fn modality(&self) -> Modality {
        Modality::Keyboard
    }

    fn native_kinds(&self) -> &'static [NativeEventKind] {
        &[NativeEventKind::KeyDown, NativeEventKind::KeyUp]
    }

    fn handle(&self, device: &DeviceCore, event: &NativeEvent) {
        let (down, key) = match event {
            NativeEvent::KeyDown(key) => (true, key),
            NativeEvent::KeyUp(key) => (false, key),
            _ => return,
        };
        let Some(code) = key.control_name() else {
            log::trace!("{}: key event without code or key", device.name());
            return;
        };

        let control =
            device.get_or_create_control(code, ControlKind::Key(device.config().button.clone()));
        // Auto-repeat leaves the value unchanged; only the device event carries it.
        control.set_value(down, Some(event));

        let snapshot = KeySnapshot {
            code: code.to_owned(),
            key: key.key.clone(),
            modifiers: key.modifiers,
            repeat: key.repeat,
        };
        device.emit(&if down {
            DeviceEvent::KeyDown(snapshot)
        } else {
            DeviceEvent::KeyUp(snapshot)
        });
    }
}

/// Keyboard device with key-oriented queries.
#[derive(Clone, Debug)]
pub struct Keyboard {
    device: Device,
}

impl Keyboard {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &InputConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: &InputConfig) -> Self {
        Self {
            device: Device::new(name, KeyboardDriver, config),
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn into_device(self) -> Device {
        self.device
    }

    /// Codes of currently held keys, sorted.
    pub fn pressed_keys(&self) -> Vec<String> {
        self.device.pressed()
    }

    pub fn is_key_pressed(&self, code: &str) -> bool {
        self.device.is_pressed(code)
    }

    /// The control for `code`, created if no event has named it yet.
    pub fn key(&self, code: &str) -> Rc<Control> {
        self.device
            .get_or_create_control(code, ControlKind::Key(self.device.config().button.clone()))
    }
}

impl Deref for Keyboard {
    type Target = Device;

    fn deref(&self) -> &Device {
        &self.device
    }
}

impl From<Keyboard> for Device {
    fn from(value: Keyboard) -> Self {
        value.device
    }
}
