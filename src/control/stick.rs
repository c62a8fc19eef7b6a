//! Analog stick filtering.

use crate::config::{StickSettings, ValueRange};
use crate::value::Vec2;

/// Clamp into the unit disk, then denoise each axis, then apply the radial deadzone.
///
/// Corner inputs are rescaled onto the disk edge even when each axis is in
/// range: `(0.9, 0.9)` becomes roughly `(0.707, 0.707)`. Denoising runs before
/// the deadzone because snapping one axis to zero can pull the magnitude under it.
pub(super) fn filter(raw: Vec2, settings: &StickSettings) -> Vec2 {
    let range = ValueRange::SIGNED_UNIT;
    let mut v = raw.map(|c| range.clamp(c));
    let magnitude = v.norm();
    if magnitude > 1.0 {
        v /= magnitude;
    }

    if settings.enable_denoising {
        v = v.map(|c| if c.abs() < settings.noise_threshold { 0.0 } else { c });
    }

    if v.norm() < settings.deadzone {
        return Vec2::zeros();
    }
    v
}
