//! Devices: one input modality bridged to a registry of controls.
//!
//! A [`Device`] is a cheap, cloneable handle around a shared [`DeviceCore`].
//! Modality-specific behavior lives in a [`DeviceDriver`]; the core owns what
//! every device shares:
//! - the control registry, keyed by control name
//! - the pressed-set, derived from the controls' own pressed/released edges
//! - the native listener handles installed on a [`HostEventSource`]
//! - the device event bus
//!
//! Every control notification is relayed as [`DeviceEvent::Control`] before the
//! driver emits its own device-level event for the native event, so binders
//! resolve first.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::backends::HostEventSource;
use crate::config::InputConfig;
use crate::control::{Control, ControlKind};
use crate::error::{InputError, Result};
use crate::event::{
    ControlEvent, ControlNotification, DeviceEvent, DeviceEventKind, NativeEvent, NativeEventKind,
};
use crate::eventbus::{EventBus, Listener, ListenerId};
use crate::filtered_listener::FilteredListener;
use crate::value::ControlValue;

/// Input modality of a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Keyboard,
    Mouse,
    Gamepad,
    Custom,
}

/// Modality-specific half of a device.
pub trait DeviceDriver {
    fn modality(&self) -> Modality;

    /// Native event kinds to listen for while observing. `Blur` is always added.
    fn native_kinds(&self) -> &'static [NativeEventKind];

    /// Register eagerly created controls. Called once, at construction.
    fn install_controls(&self, _device: &DeviceCore) {}

    /// Translate one native event into control updates and device events.
    fn handle(&self, device: &DeviceCore, event: &NativeEvent);
}

/// Which device events a listener receives.
#[derive(Clone, Debug)]
pub enum DeviceEventFilter {
    All,
    Kind(DeviceEventKind),
    /// Relayed notifications of one control.
    Control(String),
    Custom(fn(&DeviceEvent) -> bool),
}

impl DeviceEventFilter {
    pub fn accepts(&self, event: &DeviceEvent) -> bool {
        match self {
            DeviceEventFilter::All => true,
            DeviceEventFilter::Kind(kind) => event.kind() == *kind,
            DeviceEventFilter::Control(name) => {
                event.as_control().is_some_and(|n| n.control == *name)
            }
            DeviceEventFilter::Custom(f) => f(event),
        }
    }
}

struct Registered {
    control: Rc<Control>,
    relay: ListenerId,
}

struct Installed {
    source: Rc<dyn HostEventSource>,
    handles: Vec<ListenerId>,
}

/// Shared state of a device. Reached through [`Device`] (which derefs to it)
/// and handed to drivers.
pub struct DeviceCore {
    this: Weak<DeviceCore>,
    name: String,
    config: InputConfig,
    driver: Box<dyn DeviceDriver>,
    controls: RefCell<BTreeMap<String, Registered>>,
    pressed: RefCell<BTreeSet<String>>,
    events: EventBus<DeviceEvent>,
    installed: RefCell<Option<Installed>>,
}

impl DeviceCore {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modality(&self) -> Modality {
        self.driver.modality()
    }

    /// Settings used for controls this device creates.
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    // ----- listener lifecycle -----

    /// Install native listeners on `source`. A second call while observing is a no-op.
    pub fn observe(&self, source: Rc<dyn HostEventSource>) {
        if self.installed.borrow().is_some() {
            log::debug!("{}: already observing", self.name);
            return;
        }
        let mut kinds = self.driver.native_kinds().to_vec();
        if !kinds.contains(&NativeEventKind::Blur) {
            kinds.push(NativeEventKind::Blur);
        }
        let handles = kinds
            .into_iter()
            .map(|kind| {
                let weak = self.this.clone();
                source.add_listener(
                    kind,
                    Box::new(move |event: &NativeEvent| {
                        if let Some(core) = weak.upgrade() {
                            core.handle_native(event);
                        }
                    }),
                )
            })
            .collect::<Vec<_>>();
        log::debug!("{}: installed {} native listener(s)", self.name, handles.len());
        *self.installed.borrow_mut() = Some(Installed { source, handles });
    }

    /// Alias of [`observe`](Self::observe).
    pub fn start(&self, source: Rc<dyn HostEventSource>) {
        self.observe(source);
    }

    /// Release every pressed control, then remove the native listeners.
    /// Safe to call when not observing.
    pub fn unobserve(&self) {
        self.release_all();
        let Some(installed) = self.installed.borrow_mut().take() else {
            return;
        };
        for id in &installed.handles {
            installed.source.remove_listener(*id);
        }
        log::debug!(
            "{}: removed {} native listener(s)",
            self.name,
            installed.handles.len()
        );
    }

    /// Alias of [`unobserve`](Self::unobserve).
    pub fn stop(&self) {
        self.unobserve();
    }

    pub fn is_observing(&self) -> bool {
        self.installed.borrow().is_some()
    }

    /// Stop, detach from every control and drop the registry and listeners.
    pub fn dispose(&self) {
        self.unobserve();
        let registry = std::mem::take(&mut *self.controls.borrow_mut());
        for registered in registry.into_values() {
            registered.control.off(registered.relay);
        }
        self.pressed.borrow_mut().clear();
        self.events.clear();
    }

    /// Route a native event to the driver. `Blur` is handled here for every modality.
    pub fn handle_native(&self, event: &NativeEvent) {
        match event {
            NativeEvent::Blur => self.blur(),
            _ => self.driver.handle(self, event),
        }
    }

    /// Focus loss: release every pressed control, then emit [`DeviceEvent::Blur`].
    pub fn blur(&self) {
        self.release_all();
        self.events.emit(&DeviceEvent::Blur);
    }

    /// Release every pressed button-like control (emitting their `Released`
    /// notifications) and clear the pressed-set. Returns how many were released.
    pub fn release_all(&self) -> usize {
        let held: Vec<Rc<Control>> = self
            .controls
            .borrow()
            .values()
            .filter(|r| r.control.is_pressed())
            .map(|r| Rc::clone(&r.control))
            .collect();
        for control in &held {
            control.release();
        }
        self.pressed.borrow_mut().clear();
        if !held.is_empty() {
            log::debug!("{}: released {} control(s)", self.name, held.len());
        }
        held.len()
    }

    // ----- control registry -----

    pub fn control(&self, name: &str) -> Option<Rc<Control>> {
        self.controls
            .borrow()
            .get(name)
            .map(|r| Rc::clone(&r.control))
    }

    /// All controls, ordered by name.
    pub fn controls(&self) -> Vec<Rc<Control>> {
        self.controls
            .borrow()
            .values()
            .map(|r| Rc::clone(&r.control))
            .collect()
    }

    pub fn control_names(&self) -> Vec<String> {
        self.controls.borrow().keys().cloned().collect()
    }

    /// Existing control `name`, or a new one of `kind` registered on the spot.
    pub fn get_or_create_control(&self, name: &str, kind: ControlKind) -> Rc<Control> {
        if let Some(existing) = self.control(name) {
            if existing.kind().label() != kind.label() {
                log::warn!(
                    "{}: control {name} is a {}, not a {}",
                    self.name,
                    existing.kind().label(),
                    kind.label()
                );
            }
            return existing;
        }
        let control = Control::owned_by(name, kind, &self.name);
        self.register(Rc::clone(&control));
        control
    }

    /// Adopt a standalone control. Fails on a name collision within this
    /// device or when the control already belongs to another device.
    pub fn add_control(&self, control: Rc<Control>) -> Result<Rc<Control>> {
        if self.controls.borrow().contains_key(control.name()) {
            return Err(InputError::DuplicateControl {
                device: self.name.clone(),
                control: control.name().to_owned(),
            });
        }
        control.attach_to(&self.name)?;
        self.register(Rc::clone(&control));
        Ok(control)
    }

    fn register(&self, control: Rc<Control>) {
        let weak = self.this.clone();
        let name = control.name().to_owned();
        let relay = control.on_any(move |event: &ControlEvent| {
            if let Some(core) = weak.upgrade() {
                core.relay(&name, event);
            }
        });
        if control.is_pressed() {
            self.pressed.borrow_mut().insert(control.name().to_owned());
        }
        log::trace!("{}: registered {}", self.name, control.name());
        self.controls.borrow_mut().insert(
            control.name().to_owned(),
            Registered { control, relay },
        );
    }

    fn relay(&self, control: &str, event: &ControlEvent) {
        match event {
            ControlEvent::Pressed { .. } => {
                self.pressed.borrow_mut().insert(control.to_owned());
            }
            ControlEvent::Released => {
                self.pressed.borrow_mut().remove(control);
            }
            ControlEvent::Updated { .. } => {}
        }
        self.events.emit(&DeviceEvent::Control(ControlNotification {
            device: self.name.clone(),
            control: control.to_owned(),
            event: event.clone(),
        }));
    }

    // ----- queries -----

    pub fn is_pressed(&self, control: &str) -> bool {
        self.pressed.borrow().contains(control)
    }

    /// Names of pressed controls, sorted.
    pub fn pressed(&self) -> Vec<String> {
        self.pressed.borrow().iter().cloned().collect()
    }

    pub fn value(&self, control: &str) -> Option<ControlValue> {
        self.control(control).map(|c| c.value())
    }

    // ----- device events -----

    pub fn on(
        &self,
        filter: DeviceEventFilter,
        listener: impl Listener<DeviceEvent> + 'static,
    ) -> ListenerId {
        match filter {
            DeviceEventFilter::All => self.events.add_listener(listener),
            filter => self.events.add_listener(FilteredListener::new(
                move |event: &DeviceEvent| filter.accepts(event),
                listener,
            )),
        }
    }

    pub fn on_any(&self, listener: impl Listener<DeviceEvent> + 'static) -> ListenerId {
        self.on(DeviceEventFilter::All, listener)
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    /// Emit a device-level event. Drivers call this after updating controls.
    pub fn emit(&self, event: &DeviceEvent) {
        self.events.emit(event);
    }
}

impl fmt::Debug for DeviceCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("modality", &self.modality())
            .field("controls", &self.controls.borrow().len())
            .field("pressed", &*self.pressed.borrow())
            .field("observing", &self.is_observing())
            .finish()
    }
}

/// Cloneable handle to a device.
#[derive(Clone, Debug)]
pub struct Device {
    core: Rc<DeviceCore>,
}

impl Device {
    pub fn new(
        name: impl Into<String>,
        driver: impl DeviceDriver + 'static,
        config: &InputConfig,
    ) -> Self {
        let core = Rc::new_cyclic(|this| DeviceCore {
            this: this.clone(),
            name: name.into(),
            config: config.clone(),
            driver: Box::new(driver),
            controls: RefCell::new(BTreeMap::new()),
            pressed: RefCell::new(BTreeSet::new()),
            events: EventBus::new(),
            installed: RefCell::new(None),
        });
        core.driver.install_controls(&core);
        Device { core }
    }

    pub fn downgrade(&self) -> WeakDevice {
        WeakDevice(Rc::downgrade(&self.core))
    }

    /// Whether both handles refer to the same device.
    pub fn ptr_eq(&self, other: &Device) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

impl Deref for Device {
    type Target = DeviceCore;

    fn deref(&self) -> &DeviceCore {
        &self.core
    }
}

/// Non-owning device handle, for observers that must not keep a device alive.
#[derive(Clone, Debug, Default)]
pub struct WeakDevice(Weak<DeviceCore>);

impl WeakDevice {
    pub fn upgrade(&self) -> Option<Device> {
        self.0.upgrade().map(|core| Device { core })
    }
}
