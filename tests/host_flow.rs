use std::cell::RefCell;
use std::rc::Rc;

use inputmap::backends::{Keyboard, Mouse, VirtualHost};
use inputmap::event::{ControlEvent, NativeEvent, WheelEvent};
use inputmap::{
    Binder, Binding, BindingEvent, BindingProfile, DeviceEvent, DeviceEventFilter, DeviceManager,
    InputConfig,
};

type Trace = Rc<RefCell<Vec<String>>>;

fn trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn dispatch_happens_before_the_device_event() {
    let host = Rc::new(VirtualHost::new());
    let kb = Keyboard::new("keyboard");
    kb.observe(host.clone());

    let log = trace();
    let sink = Rc::clone(&log);
    kb.on_any(move |e: &DeviceEvent| {
        let line = match e {
            DeviceEvent::Control(n) => format!("control {:?}", n.event.kind()),
            other => format!("device {:?}", other.kind()),
        };
        sink.borrow_mut().push(line);
    });

    let sink = Rc::clone(&log);
    let binder = Binder::new(move |_: Option<&str>, action: &str| {
        sink.borrow_mut().push(format!("dispatch {action}"))
    });
    binder.observe(&kb);
    binder
        .add_binding(Binding::new("jump", "keyboard", "Space", BindingEvent::Pressed))
        .unwrap();

    host.key_down("Space");
    assert_eq!(
        *log.borrow(),
        vec![
            "control Updated",
            "control Pressed",
            "dispatch jump",
            "device KeyDown",
        ]
    );
}

#[test]
fn focus_loss_never_leaves_stuck_keys() {
    let host = Rc::new(VirtualHost::new());
    let mut manager = DeviceManager::with_standard_devices(&InputConfig::default());
    manager.start(host.clone());

    for code in ["KeyW", "KeyA", "ShiftLeft", "Space"] {
        host.key_down(code);
    }
    host.pointer_down(0, 1.0, 1.0);
    host.pointer_down(2, 1.0, 1.0);

    let released = trace();
    for device in manager.devices() {
        let sink = Rc::clone(&released);
        device.on(
            DeviceEventFilter::Kind(inputmap::DeviceEventKind::Control),
            move |e: &DeviceEvent| {
                if let Some(n) = e.as_control() {
                    if n.event == ControlEvent::Released {
                        sink.borrow_mut().push(format!("{}/{}", n.device, n.control));
                    }
                }
            },
        );
    }

    host.blur();

    let snap = manager.snapshot();
    for (_, device) in snap.iter() {
        assert!(device.pressed.is_empty(), "{} still pressed", device.name);
        assert!(device.controls.values().all(|c| !c.pressed));
    }
    let mut released = released.borrow().clone();
    released.sort();
    assert_eq!(
        released,
        vec![
            "keyboard/KeyA",
            "keyboard/KeyW",
            "keyboard/ShiftLeft",
            "keyboard/Space",
            "mouse/left",
            "mouse/right",
        ]
    );

    // input after the blur works normally
    host.key_down("KeyW");
    assert!(manager.device("keyboard").unwrap().is_pressed("KeyW"));
}

#[test]
fn stop_emits_releases_before_detaching() {
    let host = Rc::new(VirtualHost::new());
    let kb = Keyboard::new("keyboard");
    kb.start(host.clone());
    host.key_down("KeyE");

    let log = trace();
    let sink = Rc::clone(&log);
    kb.key("KeyE").on_any(move |e: &ControlEvent| {
        sink.borrow_mut().push(format!("{:?}", e.kind()))
    });

    kb.stop();
    assert_eq!(*log.borrow(), vec!["Updated", "Released"]);
    assert_eq!(host.listener_count(), 0);

    host.key_down("KeyE");
    assert!(kb.pressed_keys().is_empty());
}

#[test]
fn profile_from_toml_drives_mouse_and_keyboard() {
    let profile = BindingProfile::from_toml_str(
        r#"
name = "editor"

[[bindings]]
action = "select"
device = "mouse"
control = "left"

[[bindings]]
action = "zoom"
device = "mouse"
control = "navigation"
event = "changed"

[[bindings]]
action = "undo"
device = "keyboard"
control = ["ControlLeft", "KeyZ"]
controller = "history"
"#,
    )
    .unwrap();

    let host = Rc::new(VirtualHost::new());
    let kb = Keyboard::new("keyboard");
    let mouse = Mouse::new("mouse");
    kb.observe(host.clone());
    mouse.observe(host.clone());

    let fired: Rc<RefCell<Vec<(Option<String>, String)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    let binder = Binder::new(move |controller: Option<&str>, action: &str| {
        sink.borrow_mut()
            .push((controller.map(str::to_owned), action.to_owned()))
    });
    binder.observe(&kb);
    binder.observe(&mouse);
    binder.load_profile(&profile).unwrap();

    host.pointer_down(0, 10.0, 10.0);
    host.wheel(0.0, 10.0);
    host.wheel(0.0, 10.0);
    host.key_down("KeyZ");
    host.key_down("ControlLeft");

    let fired = fired.borrow();
    let actions: Vec<&str> = fired.iter().map(|(_, a)| a.as_str()).collect();
    assert_eq!(actions, vec!["select", "zoom", "zoom", "undo"]);
    assert_eq!(fired[3].0.as_deref(), Some("history"));
}

#[test]
fn pinch_gesture_is_visible_to_listeners() {
    let mouse = Mouse::new("mouse");
    let nav = mouse.control("navigation").unwrap();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let weak = Rc::downgrade(&nav);
    nav.on_any(move |_: &ControlEvent| {
        *sink.borrow_mut() = weak.upgrade().map(|c| c.gesture());
    });

    mouse.handle_native(&NativeEvent::Wheel(
        WheelEvent::new(0.0, -4.0).with_modifiers(inputmap::event::Modifiers::ctrl()),
    ));
    let gesture = seen.borrow().unwrap();
    assert!(gesture.trackpad_pinch_zoom);
    assert!(!gesture.trackpad_pan);
}
