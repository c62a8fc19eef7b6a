use std::rc::Rc;

use inputmap::backends::{Gamepad, VirtualHost};
use inputmap::event::GamepadEvent;
use inputmap::{Binder, Binding, BindingEvent, DeviceLogger, DeviceManager, InputConfig};

fn main() {
    env_logger::init();

    let config = InputConfig::default();
    let host = Rc::new(VirtualHost::new());

    // Keyboard, mouse and one gamepad slot, all fed by the virtual host
    let mut manager = DeviceManager::with_standard_devices(&config);
    manager
        .add_device(Gamepad::with_config("gamepad0", 0, &config))
        .expect("unique device name");
    manager.start(host.clone());

    let binder = Binder::with_config(
        |controller: Option<&str>, action: &str| {
            println!("(Virtual) action {action} -> {}", controller.unwrap_or("*"))
        },
        &config,
    );
    for device in manager.devices() {
        device.on_any(DeviceLogger::new(device.name()));
        binder.observe(device);
    }
    binder
        .add_binding(Binding::new("jump", "keyboard", "Space", BindingEvent::Pressed))
        .and_then(|_| {
            binder.add_binding(Binding::new("fire", "mouse", "left", BindingEvent::Pressed))
        })
        .and_then(|_| {
            binder.add_binding(Binding::new(
                "aim",
                "gamepad0",
                "RightStick",
                BindingEvent::Changed,
            ))
        })
        .and_then(|_| {
            binder.add_binding(Binding::composite(
                "save",
                "keyboard",
                ["ControlLeft", "KeyS"],
                BindingEvent::Pressed,
            ))
        })
        .expect("valid bindings");

    // Inject some sample input
    host.key_down("Space");
    host.key_up("Space");
    host.key_down("ControlLeft");
    host.key_down("KeyS");
    host.pointer_down(0, 120.0, 80.0);
    host.wheel(0.0, 120.0);
    host.gamepad(GamepadEvent {
        index: 0,
        buttons: vec![1.0],
        axes: vec![0.0, 0.0, 0.6, -0.3],
        ..GamepadEvent::default()
    });

    // Focus loss releases everything still held
    host.blur();

    let snapshot = manager.snapshot();
    println!("{}", snapshot.to_json().expect("serializable snapshot"));
    manager.stop();
}
