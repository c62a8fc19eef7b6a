use log::Level;

use crate::event::DeviceEvent;
use crate::eventbus::Listener;

/// A listener that logs every device event through the `log` facade.
#[derive(Debug, Clone)]
pub struct DeviceLogger {
    device: String,
    level: Level,
}

impl DeviceLogger {
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            level: Level::Debug,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl Listener<DeviceEvent> for DeviceLogger {
    fn on_event(&self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Control(n) => {
                log::log!(self.level, "[{}] {}: {:?}", self.device, n.control, n.event)
            }
            other => log::log!(self.level, "[{}] {:?}", self.device, other),
        }
    }
}
