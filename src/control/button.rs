//! Button and key behavior: value coercion and press/release edges.

use super::{Control, ControlKind, ControlState};
use crate::config::ButtonSettings;
use crate::event::NativeEvent;
use crate::value::ControlInput;

/// Analog buttons clamp into `[0, 1]`; digital ones snap to `0.0`/`1.0` at the threshold.
pub(super) fn coerce(input: &ControlInput, settings: &ButtonSettings) -> f32 {
    let v = input.to_scalar().clamp(0.0, 1.0);
    if settings.digital {
        if v >= settings.press_threshold {
            1.0
        } else {
            0.0
        }
    } else {
        v
    }
}

/// Update the pressed flag after an assignment.
///
/// Returns `Some(true)` on the upward threshold crossing, `Some(false)` on the
/// downward one, `None` when the value stayed on the same side.
pub(super) fn edge(kind: &ControlKind, state: &mut ControlState) -> Option<bool> {
    let threshold = match kind {
        ControlKind::Button(s) | ControlKind::Key(s) => s.press_threshold,
        _ => return None,
    };
    let value = state.value.as_scalar().unwrap_or(0.0);
    let pressed = value >= threshold;
    if pressed == state.pressed {
        return None;
    }
    state.pressed = pressed;
    Some(pressed)
}

impl Control {
    /// Drive a button-like control to fully pressed.
    pub fn press(&self, native: Option<&NativeEvent>) -> bool {
        self.set_value(1.0f32, native)
    }

    /// Drive a button-like control to fully released.
    pub fn release(&self) -> bool {
        self.set_value(0.0f32, None)
    }

    /// Press threshold for button-like controls.
    pub fn press_threshold(&self) -> Option<f32> {
        match &self.kind {
            ControlKind::Button(s) | ControlKind::Key(s) => Some(s.press_threshold),
            _ => None,
        }
    }
}
