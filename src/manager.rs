use std::collections::BTreeMap;
use std::rc::Rc;

use crate::backends::{HostEventSource, Keyboard, Mouse};
use crate::config::InputConfig;
use crate::device::Device;
use crate::error::{InputError, Result};
use crate::snapshot::{DeviceSnapshot, Snapshot};

/// Owns a set of uniquely named devices and drives their lifecycle together.
pub struct DeviceManager {
    config: InputConfig,
    devices: BTreeMap<String, Device>,
    source: Option<Rc<dyn HostEventSource>>,
}

impl DeviceManager {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            config: config.clone(),
            devices: BTreeMap::new(),
            source: None,
        }
    }

    /// A manager with a `keyboard` and a `mouse`.
    pub fn with_standard_devices(config: &InputConfig) -> Self {
        let mut manager = Self::new(config);
        manager
            .devices
            .insert("keyboard".into(), Keyboard::with_config("keyboard", config).into());
        manager
            .devices
            .insert("mouse".into(), Mouse::with_config("mouse", config).into());
        log::debug!("manager: loaded {} standard device(s)", manager.devices.len());
        manager
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Add a device. If the manager is started, the device starts observing too.
    pub fn add_device(&mut self, device: impl Into<Device>) -> Result<Device> {
        let device = device.into();
        if self.devices.contains_key(device.name()) {
            return Err(InputError::DuplicateDevice(device.name().to_owned()));
        }
        if let Some(source) = &self.source {
            device.observe(Rc::clone(source));
        }
        self.devices
            .insert(device.name().to_owned(), device.clone());
        Ok(device)
    }

    /// Remove a device, stopping it first.
    pub fn remove_device(&mut self, name: &str) -> Option<Device> {
        let device = self.devices.remove(name)?;
        device.stop();
        Some(device)
    }

    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.get(name)
    }

    /// Devices in name order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Start every device on `source`. Restarting on another source stops first.
    pub fn start(&mut self, source: Rc<dyn HostEventSource>) {
        if let Some(current) = &self.source {
            if Rc::ptr_eq(current, &source) {
                return;
            }
            self.stop();
        }
        for device in self.devices.values() {
            device.start(Rc::clone(&source));
        }
        self.source = Some(source);
    }

    /// Stop every device: pressed controls are released before listeners detach.
    pub fn stop(&mut self) {
        for device in self.devices.values() {
            device.stop();
        }
        self.source = None;
    }

    pub fn is_started(&self) -> bool {
        self.source.is_some()
    }

    /// Deliver a focus loss to every device.
    pub fn blur_all(&self) {
        for device in self.devices.values() {
            device.blur();
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(
            self.devices
                .iter()
                .map(|(name, device)| (name.clone(), DeviceSnapshot::of(device)))
                .collect(),
        )
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}

impl Drop for DeviceManager {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{Gamepad, VirtualHost};

    #[test]
    fn standard_devices_and_duplicates() {
        let mut manager = DeviceManager::with_standard_devices(&InputConfig::default());
        assert_eq!(
            manager.devices().map(|d| d.name().to_owned()).collect::<Vec<_>>(),
            vec!["keyboard", "mouse"]
        );
        assert!(matches!(
            manager.add_device(Keyboard::new("keyboard")),
            Err(InputError::DuplicateDevice(_))
        ));
        manager.add_device(Gamepad::new("gamepad0", 0)).unwrap();
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn start_stop_and_late_devices() {
        let host = Rc::new(VirtualHost::new());
        let mut manager = DeviceManager::with_standard_devices(&InputConfig::default());
        manager.start(host.clone());
        manager.start(host.clone());
        assert!(manager.is_started());

        let pad = manager.add_device(Gamepad::new("gamepad0", 0)).unwrap();
        assert!(pad.is_observing());

        host.key_down("KeyA");
        host.pointer_down(0, 0.0, 0.0);
        let snap = manager.snapshot();
        assert!(snap.get("keyboard").unwrap().is_pressed("KeyA"));
        assert!(snap.get("mouse").unwrap().is_pressed("left"));

        manager.stop();
        assert_eq!(host.listener_count(), 0);
        let snap = manager.snapshot();
        assert!(snap.iter().all(|(_, d)| d.pressed.is_empty() && !d.observing));
    }

    #[test]
    fn blur_all_releases_everything() {
        let manager = DeviceManager::with_standard_devices(&InputConfig::default());
        let kb = manager.device("keyboard").unwrap();
        kb.handle_native(&crate::event::NativeEvent::KeyDown(
            crate::event::KeyboardEvent::new("KeyW"),
        ));
        assert!(kb.is_pressed("KeyW"));
        manager.blur_all();
        assert!(!kb.is_pressed("KeyW"));
    }

    #[test]
    fn remove_device_stops_it() {
        let host = Rc::new(VirtualHost::new());
        let mut manager = DeviceManager::with_standard_devices(&InputConfig::default());
        manager.start(host.clone());
        let mouse = manager.remove_device("mouse").unwrap();
        assert!(!mouse.is_observing());
        assert!(manager.device("mouse").is_none());
    }
}
