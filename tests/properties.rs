use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;

use inputmap::backends::Keyboard;
use inputmap::config::{FloatSettings, StickSettings};
use inputmap::event::{ControlEventKind, KeyboardEvent, NativeEvent};
use inputmap::{Control, ControlValue, Vec2};

fn counter(control: &Control, kind: ControlEventKind) -> Rc<Cell<usize>> {
    let n = Rc::new(Cell::new(0));
    let sink = Rc::clone(&n);
    control.on(kind, move |_: &inputmap::ControlEvent| sink.set(sink.get() + 1));
    n
}

proptest! {
    #[test]
    fn button_edges_follow_threshold_crossings(values in prop::collection::vec(0.0f32..=1.0, 1..64)) {
        let button = Control::button("b");
        let threshold = button.press_threshold().unwrap();
        let pressed = counter(&button, ControlEventKind::Pressed);
        let released = counter(&button, ControlEventKind::Released);

        let mut held = false;
        let (mut ups, mut downs) = (0, 0);
        for v in &values {
            button.set_value(*v, None);
            let now = *v >= threshold;
            if now && !held { ups += 1; }
            if !now && held { downs += 1; }
            held = now;
        }
        prop_assert_eq!(pressed.get(), ups);
        prop_assert_eq!(released.get(), downs);
        prop_assert_eq!(button.is_pressed(), held);
    }

    #[test]
    fn stick_output_is_zero_or_outside_deadzone(
        x in -1.5f32..1.5,
        y in -1.5f32..1.5,
        deadzone in 0.0f32..0.9,
    ) {
        let settings = StickSettings { deadzone, noise_threshold: 0.01, enable_denoising: true };
        let stick = Control::stick("s", settings);
        stick.set_value((x, y), None);
        let v = stick.vector2();
        prop_assert!(v == Vec2::zeros() || v.norm() >= deadzone);
        prop_assert!(v.norm() <= 1.0 + 1e-5);
    }

    #[test]
    fn stick_passes_strong_in_disk_input_unchanged(
        angle in 0.0f32..std::f32::consts::TAU,
        radius in 0.3f32..0.95,
    ) {
        let settings = StickSettings { deadzone: 0.2, noise_threshold: 0.0, enable_denoising: false };
        let stick = Control::stick("s", settings);
        let input = Vec2::new(radius * angle.cos(), radius * angle.sin());
        stick.set_value(input, None);
        prop_assert_eq!(stick.vector2(), input);
    }

    #[test]
    fn repeated_values_are_silent(v in -1000.0f32..1000.0) {
        let f = Control::float("f", FloatSettings::default());
        f.set_value(v, None);
        let old = f.old_value();
        prop_assert!(!f.set_value(v, None));
        prop_assert_eq!(f.old_value(), old);

        let v2 = Control::vec2("v");
        v2.set_value([v, -v], None);
        prop_assert!(!v2.set_value((v, -v), None));
    }

    #[test]
    fn reset_then_default_is_silent(v in -5.0f32..5.0) {
        for control in [Control::button("b"), Control::key("k"), Control::vec3("v")] {
            control.set_value(v, None);
            control.reset();
            prop_assert!(!control.set_value(control.kind().default_value(), None));
            prop_assert!(!control.is_pressed());
        }
    }

    #[test]
    fn blur_releases_any_pressed_set(codes in prop::collection::btree_set("[A-Z][a-z]{0,6}", 0..12)) {
        let kb = Keyboard::new("keyboard");
        for code in &codes {
            kb.handle_native(&NativeEvent::KeyDown(KeyboardEvent::new(code.as_str())));
        }
        prop_assert_eq!(kb.pressed_keys().len(), codes.len());
        kb.handle_native(&NativeEvent::Blur);
        prop_assert!(kb.pressed_keys().is_empty());
        prop_assert!(kb.controls().iter().all(|c| !c.is_pressed() && c.value() == ControlValue::Scalar(0.0)));
    }
}
