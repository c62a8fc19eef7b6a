//! Resolves live control notifications against bindings and dispatches actions.
//!
//! A [`Binder`] subscribes to the relayed control notifications of every device
//! it observes. For each notification it walks the bindings that reference that
//! `(device, control)` pair:
//! - simple bindings fire when the notification kind matches the binding event
//! - composite bindings track per-constituent satisfaction and fire only when
//!   the update completes the combo
//!
//! Composite satisfaction per binding event:
//! - `pressed`: a constituent is satisfied while held; fires on the update that
//!   makes the last one held, and not again until some constituent is released
//! - `released`: a constituent is satisfied by its release edge; fires when all
//!   have released (a re-press clears that constituent), then starts over
//! - `changed`: a constituent is satisfied while its value is non-default;
//!   fires on every constituent update while all are satisfied
//!
//! The binder never owns devices. Dispatch happens after the binding table
//! borrow is released, so dispatchers may add or remove bindings.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::binding::{Binding, BindingControls, BindingEvent, BindingProfile};
use crate::config::{BinderSettings, InputConfig, UnknownControllerPolicy};
use crate::device::{Device, DeviceCore, DeviceEventFilter, WeakDevice};
use crate::error::{InputError, Result};
use crate::event::{ControlEvent, ControlNotification, DeviceEvent, DeviceEventKind};
use crate::eventbus::ListenerId;

/// Receives fired actions. Implemented for any `Fn(Option<&str>, &str)`.
pub trait ActionDispatcher {
    fn dispatch(&self, controller: Option<&str>, action: &str);

    /// Whether `controller` can receive actions. Consulted by
    /// [`Binder::validate`] and by the `warn`/`reject` policies.
    fn has_controller(&self, _controller: &str) -> bool {
        true
    }
}

impl<F: Fn(Option<&str>, &str)> ActionDispatcher for F {
    fn dispatch(&self, controller: Option<&str>, action: &str) {
        self(controller, action)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BindingId(u64);

struct Entry {
    binding: Binding,
    /// Composite only: satisfaction per constituent, in declaration order.
    satisfied: Vec<bool>,
    warned: bool,
}

impl Entry {
    fn new(binding: Binding) -> Self {
        let n = match &binding.control {
            BindingControls::Composite(names) => names.len(),
            BindingControls::Single(_) => 0,
        };
        Self {
            binding,
            satisfied: vec![false; n],
            warned: false,
        }
    }

    /// Does `notification` fire this binding?
    fn evaluate(&mut self, notification: &ControlNotification) -> bool {
        let event = self.binding.event_type;
        let BindingControls::Composite(names) = &self.binding.control else {
            return event.matches(notification.event.kind());
        };

        let now = match (event, &notification.event) {
            (BindingEvent::Pressed, ControlEvent::Pressed { .. }) => true,
            (BindingEvent::Pressed, ControlEvent::Released) => false,
            (BindingEvent::Released, ControlEvent::Released) => true,
            (BindingEvent::Released, ControlEvent::Pressed { .. }) => false,
            (BindingEvent::Changed, ControlEvent::Updated { value, .. }) => !value.is_zero(),
            _ => return false,
        };

        let was_complete = self.satisfied.iter().all(|s| *s);
        for (slot, name) in self.satisfied.iter_mut().zip(names) {
            if *name == notification.control {
                *slot = now;
            }
        }
        let complete = now && self.satisfied.iter().all(|s| *s);

        match event {
            BindingEvent::Pressed => complete && !was_complete,
            BindingEvent::Released => {
                if complete {
                    self.satisfied.fill(false);
                }
                complete
            }
            BindingEvent::Changed => complete,
        }
    }

    /// Initialize composite satisfaction from a device's current state.
    fn seed(&mut self, device: &DeviceCore) {
        let event = self.binding.event_type;
        let BindingControls::Composite(names) = &self.binding.control else {
            return;
        };
        for (slot, name) in self.satisfied.iter_mut().zip(names) {
            *slot = device.control(name).is_some_and(|c| match event {
                BindingEvent::Pressed => c.is_pressed(),
                BindingEvent::Changed => !c.value().is_zero(),
                BindingEvent::Released => false,
            });
        }
    }
}

struct Observed {
    device: WeakDevice,
    name: String,
    listener: ListenerId,
}

struct BinderInner {
    dispatcher: Box<dyn ActionDispatcher>,
    policy: UnknownControllerPolicy,
    next_id: Cell<u64>,
    bindings: RefCell<BTreeMap<BindingId, Entry>>,
    devices: RefCell<Vec<Observed>>,
}

impl BinderInner {
    fn resolve(&self, notification: &ControlNotification) {
        let fired: Vec<(BindingId, Option<String>, String)> = {
            let mut bindings = self.bindings.borrow_mut();
            bindings
                .iter_mut()
                .filter(|(_, e)| e.binding.references(&notification.device, &notification.control))
                .filter_map(|(id, e)| {
                    e.evaluate(notification).then(|| {
                        (*id, e.binding.controller_name.clone(), e.binding.action_name.clone())
                    })
                })
                .collect()
        };

        for (id, controller, action) in fired {
            if let Some(name) = controller.as_deref() {
                if !self.controller_allowed(id, name, &action) {
                    continue;
                }
            }
            log::debug!(
                "{}/{}: dispatch {action} to {}",
                notification.device,
                notification.control,
                controller.as_deref().unwrap_or("*")
            );
            self.dispatcher.dispatch(controller.as_deref(), &action);
        }
    }

    fn controller_allowed(&self, id: BindingId, controller: &str, action: &str) -> bool {
        match self.policy {
            UnknownControllerPolicy::Ignore => true,
            _ if self.dispatcher.has_controller(controller) => true,
            UnknownControllerPolicy::Warn => {
                if let Some(entry) = self.bindings.borrow_mut().get_mut(&id) {
                    if !entry.warned {
                        entry.warned = true;
                        log::warn!(
                            "action {action}: unknown controller {controller}, not dispatched"
                        );
                    }
                }
                false
            }
            UnknownControllerPolicy::Reject => false,
        }
    }

    fn observed(&self, name: &str) -> Option<Device> {
        self.devices
            .borrow()
            .iter()
            .filter(|o| o.name == name)
            .find_map(|o| o.device.upgrade())
    }
}

/// Evaluates bindings against the devices it observes.
pub struct Binder {
    inner: Rc<BinderInner>,
}

impl Binder {
    pub fn new(dispatcher: impl ActionDispatcher + 'static) -> Self {
        Self::with_settings(dispatcher, &BinderSettings::default())
    }

    pub fn with_config(dispatcher: impl ActionDispatcher + 'static, config: &InputConfig) -> Self {
        Self::with_settings(dispatcher, &config.binder)
    }

    pub fn with_settings(
        dispatcher: impl ActionDispatcher + 'static,
        settings: &BinderSettings,
    ) -> Self {
        Self {
            inner: Rc::new(BinderInner {
                dispatcher: Box::new(dispatcher),
                policy: settings.unknown_controller,
                next_id: Cell::new(0),
                bindings: RefCell::new(BTreeMap::new()),
                devices: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn policy(&self) -> UnknownControllerPolicy {
        self.inner.policy
    }

    // ----- bindings -----

    /// Register a binding. Bindings may name devices that are not observed
    /// (yet); they stay inert until one is.
    pub fn add_binding(&self, binding: Binding) -> Result<BindingId> {
        binding.validate()?;
        if self.inner.policy == UnknownControllerPolicy::Reject {
            if let Some(controller) = &binding.controller_name {
                if !self.inner.dispatcher.has_controller(controller) {
                    return Err(InputError::UnknownController {
                        action: binding.action_name.clone(),
                        controller: controller.clone(),
                    });
                }
            }
        }

        let id = BindingId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        let mut entry = Entry::new(binding);
        if let Some(device) = self.inner.observed(&entry.binding.device_name) {
            entry.seed(&device);
        }
        log::debug!(
            "binding {:?}: {} on {}/{:?}",
            id,
            entry.binding.action_name,
            entry.binding.device_name,
            entry.binding.control_names()
        );
        self.inner.bindings.borrow_mut().insert(id, entry);
        Ok(id)
    }

    pub fn remove_binding(&self, id: BindingId) -> Option<Binding> {
        self.inner
            .bindings
            .borrow_mut()
            .remove(&id)
            .map(|e| e.binding)
    }

    /// Add every binding of `profile`. Nothing is added if any binding is invalid.
    pub fn load_profile(&self, profile: &BindingProfile) -> Result<Vec<BindingId>> {
        for binding in &profile.bindings {
            binding.validate()?;
        }
        if self.inner.policy == UnknownControllerPolicy::Reject {
            for binding in &profile.bindings {
                self.check_controller(binding)?;
            }
        }
        profile
            .bindings
            .iter()
            .map(|b| self.add_binding(b.clone()))
            .collect()
    }

    pub fn clear_bindings(&self) {
        self.inner.bindings.borrow_mut().clear();
    }

    /// Every binding, in registration order.
    pub fn get_all_bindings(&self) -> Vec<Binding> {
        self.inner
            .bindings
            .borrow()
            .values()
            .map(|e| e.binding.clone())
            .collect()
    }

    /// Every binding with its id, in registration order.
    pub fn bindings(&self) -> Vec<(BindingId, Binding)> {
        self.inner
            .bindings
            .borrow()
            .iter()
            .map(|(id, e)| (*id, e.binding.clone()))
            .collect()
    }

    pub fn binding(&self, id: BindingId) -> Option<Binding> {
        self.inner
            .bindings
            .borrow()
            .get(&id)
            .map(|e| e.binding.clone())
    }

    pub fn bindings_for_action(&self, action: &str) -> Vec<Binding> {
        self.select(|b| b.action_name == action)
    }

    pub fn bindings_for_device(&self, device: &str) -> Vec<Binding> {
        self.select(|b| b.device_name == device)
    }

    /// Bindings grouped by action name.
    pub fn bindings_by_action(&self) -> BTreeMap<String, Vec<Binding>> {
        self.group(|b| &b.action_name)
    }

    /// Bindings grouped by device name.
    pub fn bindings_by_device(&self) -> BTreeMap<String, Vec<Binding>> {
        self.group(|b| &b.device_name)
    }

    fn select(&self, keep: impl Fn(&Binding) -> bool) -> Vec<Binding> {
        self.inner
            .bindings
            .borrow()
            .values()
            .filter(|e| keep(&e.binding))
            .map(|e| e.binding.clone())
            .collect()
    }

    fn group(&self, key: impl Fn(&Binding) -> &String) -> BTreeMap<String, Vec<Binding>> {
        let mut groups: BTreeMap<String, Vec<Binding>> = BTreeMap::new();
        for entry in self.inner.bindings.borrow().values() {
            groups
                .entry(key(&entry.binding).clone())
                .or_default()
                .push(entry.binding.clone());
        }
        groups
    }

    /// Check every controller name against the dispatcher.
    pub fn validate(&self) -> Result<()> {
        for entry in self.inner.bindings.borrow().values() {
            self.check_controller(&entry.binding)?;
        }
        Ok(())
    }

    fn check_controller(&self, binding: &Binding) -> Result<()> {
        match &binding.controller_name {
            Some(controller) if !self.inner.dispatcher.has_controller(controller) => {
                Err(InputError::UnknownController {
                    action: binding.action_name.clone(),
                    controller: controller.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    // ----- devices -----

    /// Start resolving bindings against `device`. Observing twice is a no-op.
    pub fn observe(&self, device: &Device) {
        let mut devices = self.inner.devices.borrow_mut();
        if devices
            .iter()
            .any(|o| o.device.upgrade().is_some_and(|d| d.ptr_eq(device)))
        {
            log::debug!("binder: already observing {}", device.name());
            return;
        }

        let weak: Weak<BinderInner> = Rc::downgrade(&self.inner);
        let listener = device.on(
            DeviceEventFilter::Kind(DeviceEventKind::Control),
            move |event: &DeviceEvent| {
                if let (Some(inner), Some(notification)) = (weak.upgrade(), event.as_control()) {
                    inner.resolve(notification);
                }
            },
        );
        devices.push(Observed {
            device: device.downgrade(),
            name: device.name().to_owned(),
            listener,
        });
        drop(devices);

        for entry in self.inner.bindings.borrow_mut().values_mut() {
            if entry.binding.device_name == device.name() {
                entry.seed(device);
            }
        }
        log::debug!("binder: observing {}", device.name());
    }

    /// Stop resolving against `device`. Returns whether it was observed.
    pub fn unobserve(&self, device: &Device) -> bool {
        let mut removed = Vec::new();
        self.inner
            .devices
            .borrow_mut()
            .retain(|o| match o.device.upgrade() {
                Some(d) if d.ptr_eq(device) => {
                    removed.push(o.listener);
                    false
                }
                Some(_) => true,
                None => false,
            });
        for id in &removed {
            device.off(*id);
        }
        !removed.is_empty()
    }

    /// Stop observing every device.
    pub fn unobserve_all(&self) {
        let observed = std::mem::take(&mut *self.inner.devices.borrow_mut());
        for o in observed {
            if let Some(device) = o.device.upgrade() {
                device.off(o.listener);
            }
        }
    }

    /// Names of the live devices being observed.
    pub fn observed_devices(&self) -> Vec<String> {
        self.inner
            .devices
            .borrow()
            .iter()
            .filter(|o| o.device.upgrade().is_some())
            .map(|o| o.name.clone())
            .collect()
    }
}

impl Drop for Binder {
    fn drop(&mut self) {
        self.unobserve_all();
    }
}

impl fmt::Debug for Binder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder")
            .field("policy", &self.inner.policy)
            .field("bindings", &self.inner.bindings.borrow().len())
            .field("devices", &self.observed_devices())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{Keyboard, Mouse, VirtualHost};
    use crate::event::{KeyboardEvent, NativeEvent};

    type Fired = Rc<RefCell<Vec<(Option<String>, String)>>>;

    fn recording() -> (Fired, impl Fn(Option<&str>, &str)) {
        let fired: Fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        (fired, move |controller: Option<&str>, action: &str| {
            sink.borrow_mut()
                .push((controller.map(str::to_owned), action.to_owned()))
        })
    }

    fn actions(fired: &Fired) -> Vec<String> {
        fired.borrow().iter().map(|(_, a)| a.clone()).collect()
    }

    struct Controllers {
        known: &'static [&'static str],
        fired: Fired,
    }

    impl ActionDispatcher for Controllers {
        fn dispatch(&self, controller: Option<&str>, action: &str) {
            self.fired
                .borrow_mut()
                .push((controller.map(str::to_owned), action.to_owned()));
        }

        fn has_controller(&self, controller: &str) -> bool {
            self.known.iter().any(|k| *k == controller)
        }
    }

    fn down(kb: &Keyboard, code: &str) {
        kb.handle_native(&NativeEvent::KeyDown(KeyboardEvent::new(code)));
    }

    fn up(kb: &Keyboard, code: &str) {
        kb.handle_native(&NativeEvent::KeyUp(KeyboardEvent::new(code)));
    }

    #[test]
    fn simple_bindings_match_event_kind() {
        let (fired, dispatch) = recording();
        let binder = Binder::new(dispatch);
        let kb = Keyboard::new("keyboard");
        binder.observe(&kb);
        binder
            .add_binding(Binding::new("jump", "keyboard", "Space", BindingEvent::Pressed))
            .unwrap();
        binder
            .add_binding(Binding::new("land", "keyboard", "Space", BindingEvent::Released))
            .unwrap();
        binder
            .add_binding(Binding::new("touch", "keyboard", "Space", BindingEvent::Changed))
            .unwrap();

        down(&kb, "Space");
        down(&kb, "Space");
        up(&kb, "Space");
        assert_eq!(actions(&fired), vec!["touch", "jump", "touch", "land"]);
    }

    #[test]
    fn composite_pressed_fires_on_last_constituent_only() {
        let (fired, dispatch) = recording();
        let binder = Binder::new(dispatch);
        let kb = Keyboard::new("keyboard");
        binder.observe(&kb);
        binder
            .add_binding(Binding::composite(
                "save",
                "keyboard",
                ["ControlLeft", "KeyS"],
                BindingEvent::Pressed,
            ))
            .unwrap();

        down(&kb, "KeyS");
        assert!(fired.borrow().is_empty());
        down(&kb, "ControlLeft");
        assert_eq!(actions(&fired), vec!["save"]);

        // still held: no refire on unrelated or repeated updates
        down(&kb, "KeyA");
        assert_eq!(fired.borrow().len(), 1);

        up(&kb, "KeyS");
        down(&kb, "KeyS");
        assert_eq!(fired.borrow().len(), 2);
    }

    #[test]
    fn composite_partial_then_release_never_fires() {
        let (fired, dispatch) = recording();
        let binder = Binder::new(dispatch);
        let kb = Keyboard::new("keyboard");
        binder.observe(&kb);
        binder
            .add_binding(Binding::composite(
                "save",
                "keyboard",
                ["ControlLeft", "KeyS"],
                BindingEvent::Pressed,
            ))
            .unwrap();

        down(&kb, "ControlLeft");
        up(&kb, "ControlLeft");
        down(&kb, "KeyS");
        assert!(fired.borrow().is_empty());
    }

    #[test]
    fn composite_released_fires_once_all_released() {
        let (fired, dispatch) = recording();
        let binder = Binder::new(dispatch);
        let kb = Keyboard::new("keyboard");
        binder.observe(&kb);
        binder
            .add_binding(Binding::composite(
                "chord-up",
                "keyboard",
                ["KeyA", "KeyB"],
                BindingEvent::Released,
            ))
            .unwrap();

        down(&kb, "KeyA");
        down(&kb, "KeyB");
        up(&kb, "KeyA");
        assert!(fired.borrow().is_empty());
        up(&kb, "KeyB");
        assert_eq!(actions(&fired), vec!["chord-up"]);

        // reset after firing
        down(&kb, "KeyB");
        up(&kb, "KeyB");
        assert_eq!(fired.borrow().len(), 1);
    }

    #[test]
    fn composite_changed_requires_all_non_default() {
        let (fired, dispatch) = recording();
        let binder = Binder::new(dispatch);
        let mouse = Mouse::new("mouse");
        binder.observe(&mouse);
        binder
            .add_binding(Binding::composite(
                "drag",
                "mouse",
                ["left", "movement"],
                BindingEvent::Changed,
            ))
            .unwrap();

        let host = Rc::new(VirtualHost::new());
        mouse.observe(host.clone());
        host.pointer_move(1.0, 1.0, 1.0, 0.0);
        // pointer events without movement zero the movement control
        host.pointer_down(0, 1.0, 1.0);
        assert!(fired.borrow().is_empty());

        host.pointer_move(3.0, 1.0, 2.0, 0.0);
        assert_eq!(actions(&fired), vec!["drag"]);
        // same movement: no update, no dispatch
        host.pointer_move(5.0, 1.0, 2.0, 0.0);
        assert_eq!(fired.borrow().len(), 1);
        host.pointer_move(6.0, 1.0, 1.0, 0.0);
        assert_eq!(fired.borrow().len(), 2);

        host.pointer_up(0, 6.0, 1.0);
        host.pointer_move(8.0, 1.0, 2.0, 0.0);
        assert_eq!(fired.borrow().len(), 2);
    }

    #[test]
    fn composite_is_seeded_from_held_controls() {
        let (fired, dispatch) = recording();
        let binder = Binder::new(dispatch);
        let kb = Keyboard::new("keyboard");
        down(&kb, "ShiftLeft");
        binder.observe(&kb);
        binder
            .add_binding(Binding::composite(
                "sprint",
                "keyboard",
                ["ShiftLeft", "KeyW"],
                BindingEvent::Pressed,
            ))
            .unwrap();
        down(&kb, "KeyW");
        assert_eq!(actions(&fired), vec!["sprint"]);
    }

    #[test]
    fn unobserved_devices_are_inert() {
        let (fired, dispatch) = recording();
        let binder = Binder::new(dispatch);
        binder
            .add_binding(Binding::new("jump", "keyboard", "Space", BindingEvent::Pressed))
            .unwrap();
        let kb = Keyboard::new("keyboard");
        down(&kb, "Space");
        assert!(fired.borrow().is_empty());

        binder.observe(&kb);
        binder.observe(&kb);
        up(&kb, "Space");
        down(&kb, "Space");
        assert_eq!(actions(&fired), vec!["jump"]);

        assert!(binder.unobserve(&kb));
        assert!(!binder.unobserve(&kb));
        up(&kb, "Space");
        down(&kb, "Space");
        assert_eq!(fired.borrow().len(), 1);
    }

    #[test]
    fn controller_scoping_and_policies() {
        let fired: Fired = Rc::new(RefCell::new(Vec::new()));
        let kb = Keyboard::new("keyboard");
        let binding = Binding::new("jump", "keyboard", "Space", BindingEvent::Pressed);

        let ignore = Binder::new(Controllers {
            known: &["player"],
            fired: Rc::clone(&fired),
        });
        ignore.observe(&kb);
        ignore
            .add_binding(binding.clone().for_controller("player"))
            .unwrap();
        ignore
            .add_binding(binding.clone().for_controller("ghost"))
            .unwrap();
        assert!(matches!(
            ignore.validate(),
            Err(InputError::UnknownController { .. })
        ));
        down(&kb, "Space");
        assert_eq!(
            *fired.borrow(),
            vec![
                (Some("player".to_string()), "jump".to_string()),
                (Some("ghost".to_string()), "jump".to_string()),
            ]
        );
        drop(ignore);
        up(&kb, "Space");
        fired.borrow_mut().clear();

        let warn = Binder::with_settings(
            Controllers {
                known: &["player"],
                fired: Rc::clone(&fired),
            },
            &BinderSettings {
                unknown_controller: UnknownControllerPolicy::Warn,
            },
        );
        warn.observe(&kb);
        warn.add_binding(binding.clone().for_controller("ghost")).unwrap();
        warn.add_binding(binding.clone()).unwrap();
        down(&kb, "Space");
        assert_eq!(*fired.borrow(), vec![(None, "jump".to_string())]);
        drop(warn);

        let reject = Binder::with_settings(
            Controllers {
                known: &["player"],
                fired: Rc::clone(&fired),
            },
            &BinderSettings {
                unknown_controller: UnknownControllerPolicy::Reject,
            },
        );
        assert!(matches!(
            reject.add_binding(binding.clone().for_controller("ghost")),
            Err(InputError::UnknownController { .. })
        ));
        let profile = BindingProfile::new("p")
            .with_binding(binding.clone())
            .with_binding(binding.for_controller("ghost"));
        assert!(reject.load_profile(&profile).is_err());
        assert!(reject.get_all_bindings().is_empty());
    }

    #[test]
    fn grouping_and_queries() {
        let (_, dispatch) = recording();
        let binder = Binder::new(dispatch);
        let profile = BindingProfile::new("p")
            .with_binding(Binding::new("jump", "keyboard", "Space", BindingEvent::Pressed))
            .with_binding(Binding::new("jump", "gamepad0", "A", BindingEvent::Pressed))
            .with_binding(Binding::new("fire", "mouse", "left", BindingEvent::Pressed));
        let ids = binder.load_profile(&profile).unwrap();
        assert_eq!(ids.len(), 3);

        assert_eq!(binder.get_all_bindings(), profile.bindings);
        assert_eq!(binder.bindings_for_action("jump").len(), 2);
        assert_eq!(binder.bindings_for_device("mouse").len(), 1);
        let by_action = binder.bindings_by_action();
        assert_eq!(by_action.keys().collect::<Vec<_>>(), vec!["fire", "jump"]);
        assert_eq!(binder.bindings_by_device().len(), 3);

        let removed = binder.remove_binding(ids[1]).unwrap();
        assert_eq!(removed.device_name, "gamepad0");
        assert_eq!(binder.binding(ids[1]), None);
        assert_eq!(binder.bindings_for_action("jump").len(), 1);
    }

    #[test]
    fn empty_composite_is_a_construction_error() {
        let (_, dispatch) = recording();
        let binder = Binder::new(dispatch);
        let empty =
            Binding::composite("x", "keyboard", Vec::<String>::new(), BindingEvent::Pressed);
        assert!(matches!(
            binder.add_binding(empty),
            Err(InputError::EmptyBinding { .. })
        ));
    }

    #[test]
    fn multiple_binders_share_a_device() {
        let (a_fired, a) = recording();
        let (b_fired, b) = recording();
        let kb = Keyboard::new("keyboard");
        let first = Binder::new(a);
        let second = Binder::new(b);
        for binder in [&first, &second] {
            binder.observe(&kb);
            binder
                .add_binding(Binding::new("jump", "keyboard", "Space", BindingEvent::Pressed))
                .unwrap();
        }
        down(&kb, "Space");
        assert_eq!(a_fired.borrow().len(), 1);
        assert_eq!(b_fired.borrow().len(), 1);
    }

    #[test]
    fn dropping_the_binder_detaches_its_listeners() {
        let kb = Keyboard::new("keyboard");
        let (fired, dispatch) = recording();
        {
            let binder = Binder::new(dispatch);
            binder.observe(&kb);
            binder
                .add_binding(Binding::new("jump", "keyboard", "Space", BindingEvent::Pressed))
                .unwrap();
        }
        down(&kb, "Space");
        assert!(fired.borrow().is_empty());
    }
}
