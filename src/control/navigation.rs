//! Wheel/trackpad gesture heuristics for navigation controls.
//!
//! The three flags are independent hints, not a partition: a gesture may be
//! none of them, and a large vertical wheel delta may count as both a zoom and a
//! pan. Pinch-zoom (ctrl/meta held, which is how trackpads report pinches)
//! always excludes the other two.

use serde::Serialize;

use super::{Control, ControlKind};
use crate::config::NavigationSettings;
use crate::event::{Modifiers, NativeEvent};
use crate::value::WheelDelta;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavigationGesture {
    pub trackpad_pinch_zoom: bool,
    pub mouse_wheel_zoom: bool,
    pub trackpad_pan: bool,
}

impl NavigationGesture {
    pub fn classify(
        delta: WheelDelta,
        modifiers: Modifiers,
        settings: &NavigationSettings,
    ) -> Self {
        let pinch = modifiers.ctrl || modifiers.meta;
        let moves = |d: f32| d.abs() > settings.negligible_delta;
        Self {
            trackpad_pinch_zoom: pinch,
            mouse_wheel_zoom: !pinch
                && !moves(delta.delta_x)
                && delta.delta_y.abs() >= settings.zoom_delta_threshold,
            trackpad_pan: !pinch && (moves(delta.delta_x) || moves(delta.delta_y)),
        }
    }
}

impl Control {
    /// Native event behind the current navigation value.
    pub fn native_event(&self) -> Option<NativeEvent> {
        self.state.borrow().native.clone()
    }

    /// Gesture flags for the current value; all `false` for other kinds.
    pub fn gesture(&self) -> NavigationGesture {
        let ControlKind::Navigation(settings) = &self.kind else {
            return NavigationGesture::default();
        };
        let modifiers = self
            .native_event()
            .map(|e| e.modifiers())
            .unwrap_or_default();
        NavigationGesture::classify(self.delta(), modifiers, settings)
    }

    pub fn is_trackpad_pinch_zoom(&self) -> bool {
        self.gesture().trackpad_pinch_zoom
    }

    pub fn is_mouse_wheel_zoom(&self) -> bool {
        self.gesture().mouse_wheel_zoom
    }

    pub fn is_trackpad_pan(&self) -> bool {
        self.gesture().trackpad_pan
    }
}
