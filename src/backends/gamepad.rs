use std::cell::Cell;
use std::ops::Deref;
use std::rc::Rc;

use crate::config::{FloatSettings, InputConfig, ValueRange};
use crate::control::ControlKind;
use crate::device::{Device, DeviceCore, DeviceDriver, Modality};
use crate::event::{DeviceEvent, GamepadEvent, NativeEvent, NativeEventKind};
use crate::value::Vec2;

/// Button names in standard-mapping order.
pub const STANDARD_BUTTONS: [&str; 17] = [
    "A",
    "B",
    "X",
    "Y",
    "LB",
    "RB",
    "LT",
    "RT",
    "Back",
    "Start",
    "LeftStickPress",
    "RightStickPress",
    "DPadUp",
    "DPadDown",
    "DPadLeft",
    "DPadRight",
    "Home",
];

pub const LEFT_STICK: &str = "LeftStick";
pub const RIGHT_STICK: &str = "RightStick";

/// Axes past the two sticks become `Axis<N>` float controls.
const STICK_AXES: usize = 4;

fn button_name(index: usize) -> String {
    STANDARD_BUTTONS
        .get(index)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Button{index}"))
}

/// One gamepad slot, standard mapping.
#[derive(Debug)]
pub struct GamepadDriver {
    index: u32,
    connected: Rc<Cell<bool>>,
    // Widest button and axis arrays seen, so shorter reports zero the rest.
    buttons_seen: Cell<usize>,
    axes_seen: Cell<usize>,
}

impl GamepadDriver {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            connected: Rc::new(Cell::new(false)),
            buttons_seen: Cell::new(STANDARD_BUTTONS.len()),
            axes_seen: Cell::new(STICK_AXES),
        }
    }

    fn connect(&self, device: &DeviceCore) {
        if !self.connected.replace(true) {
            log::debug!("{}: gamepad {} connected", device.name(), self.index);
            device.emit(&DeviceEvent::GamepadConnected { index: self.index });
        }
    }

    fn disconnect(&self, device: &DeviceCore) {
        if !self.connected.replace(false) {
            return;
        }
        // Resetting releases held buttons and recenters the sticks.
        for control in device.controls() {
            control.reset();
        }
        device.release_all();
        log::debug!("{}: gamepad {} disconnected", device.name(), self.index);
        device.emit(&DeviceEvent::GamepadDisconnected { index: self.index });
    }

    fn update(&self, device: &DeviceCore, pad: &GamepadEvent, native: &NativeEvent) {
        let config = device.config();
        let buttons = self.buttons_seen.get().max(pad.buttons.len());
        self.buttons_seen.set(buttons);
        for i in 0..buttons {
            let value = pad.buttons.get(i).copied().unwrap_or(0.0);
            device
                .get_or_create_control(&button_name(i), ControlKind::Button(config.button.clone()))
                .set_value(value, Some(native));
        }

        let axis = |i: usize| pad.axes.get(i).copied().unwrap_or(0.0);
        for (name, x, y) in [(LEFT_STICK, 0, 1), (RIGHT_STICK, 2, 3)] {
            device
                .get_or_create_control(name, ControlKind::Stick(config.stick.clone()))
                .set_value(Vec2::new(axis(x), axis(y)), Some(native));
        }

        let axes = self.axes_seen.get().max(pad.axes.len());
        self.axes_seen.set(axes);
        for i in STICK_AXES..axes {
            device
                .get_or_create_control(
                    &format!("Axis{i}"),
                    ControlKind::Float(FloatSettings::clamped(ValueRange::SIGNED_UNIT)),
                )
                .set_value(axis(i), Some(native));
        }
    }
}

impl DeviceDriver for GamepadDriver {
    fn modality(&self) -> Modality {
        Modality::Gamepad
    }

    fn native_kinds(&self) -> &'static [NativeEventKind] {
        &[NativeEventKind::Gamepad]
    }

    fn install_controls(&self, device: &DeviceCore) {
        let config = device.config();
        for name in STANDARD_BUTTONS {
            device.get_or_create_control(name, ControlKind::Button(config.button.clone()));
        }
        for name in [LEFT_STICK, RIGHT_STICK] {
            device.get_or_create_control(name, ControlKind::Stick(config.stick.clone()));
        }
    }

    fn handle(&self, device: &DeviceCore, event: &NativeEvent) {
        let NativeEvent::Gamepad(pad) = event else {
            return;
        };
        if pad.index != self.index {
            return;
        }
        if pad.disconnected {
            self.disconnect(device);
        } else {
            self.connect(device);
            self.update(device, pad, event);
        }
    }
}

/// Gamepad device bound to one slot index.
#[derive(Clone, Debug)]
pub struct Gamepad {
    device: Device,
    index: u32,
    connected: Rc<Cell<bool>>,
}

impl Gamepad {
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self::with_config(name, index, &InputConfig::default())
    }

    pub fn with_config(name: impl Into<String>, index: u32, config: &InputConfig) -> Self {
        let driver = GamepadDriver::new(index);
        let connected = Rc::clone(&driver.connected);
        Self {
            device: Device::new(name, driver, config),
            index,
            connected,
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn into_device(self) -> Device {
        self.device
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Whether a state report has arrived since the last disconnect.
    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    pub fn pressed_buttons(&self) -> Vec<String> {
        self.device.pressed()
    }

    pub fn left_stick(&self) -> Vec2 {
        self.stick(LEFT_STICK)
    }

    pub fn right_stick(&self) -> Vec2 {
        self.stick(RIGHT_STICK)
    }

    fn stick(&self, name: &str) -> Vec2 {
        self.device
            .control(name)
            .map(|c| c.vector2())
            .unwrap_or_else(Vec2::zeros)
    }
}

impl Deref for Gamepad {
    type Target = Device;

    fn deref(&self) -> &Device {
        &self.device
    }
}

impl From<Gamepad> for Device {
    fn from(value: Gamepad) -> Self {
        value.device
    }
}
