//! Tunable settings for controls, devices and binders.
//!
//! Every section is optional when loading from TOML; missing keys fall back to
//! the defaults documented on each field.
//!
//! ```
//! use inputmap::InputConfig;
//!
//! let cfg = InputConfig::from_toml_str(r#"
//!     [stick]
//!     deadzone = 0.2
//!
//!     [binder]
//!     unknown_controller = "warn"
//! "#).unwrap();
//! assert_eq!(cfg.stick.deadzone, 0.2);
//! assert_eq!(cfg.button.press_threshold, 0.1);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// Default value at which a button-like control reports "pressed".
pub const DEFAULT_PRESS_THRESHOLD: f32 = 0.1;

/// Inclusive `[min, max]` range used for clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const UNIT: ValueRange = ValueRange { min: 0.0, max: 1.0 };
    pub const SIGNED_UNIT: ValueRange = ValueRange { min: -1.0, max: 1.0 };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.min).min(self.max)
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Settings for `Button` and `Key` controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonSettings {
    /// Values at or above this are "pressed".
    pub press_threshold: f32,
    /// Digital buttons store only `0.0` or `1.0`.
    pub digital: bool,
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            press_threshold: DEFAULT_PRESS_THRESHOLD,
            digital: false,
        }
    }
}

impl ButtonSettings {
    /// Same threshold, digital values.
    pub fn digital(&self) -> Self {
        Self {
            digital: true,
            ..self.clone()
        }
    }
}

/// Settings for `Float` controls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatSettings {
    pub normalize: bool,
    pub range: ValueRange,
}

impl FloatSettings {
    pub fn clamped(range: ValueRange) -> Self {
        Self {
            normalize: true,
            range,
        }
    }
}

/// Settings for `Vec2` and `Vec3` controls. With `normalize`, each component is
/// clamped into `range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSettings {
    pub normalize: bool,
    pub range: ValueRange,
}

impl Default for VectorSettings {
    fn default() -> Self {
        Self {
            normalize: false,
            range: ValueRange::SIGNED_UNIT,
        }
    }
}

/// Settings for analog sticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickSettings {
    /// Vectors shorter than this snap to zero.
    pub deadzone: f32,
    /// Components with an absolute value below this snap to zero.
    pub noise_threshold: f32,
    pub enable_denoising: bool,
}

impl Default for StickSettings {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            noise_threshold: 0.01,
            enable_denoising: true,
        }
    }
}

/// Thresholds for the wheel/trackpad gesture heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Minimum vertical delta of a single mouse-wheel zoom notch.
    pub zoom_delta_threshold: f32,
    /// Deltas with an absolute value at or below this count as "no movement".
    pub negligible_delta: f32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            zoom_delta_threshold: 50.0,
            negligible_delta: 0.5,
        }
    }
}

/// What a binder does with a binding whose controller the dispatcher does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownControllerPolicy {
    /// Dispatch anyway; the dispatcher decides (usually a silent no-op).
    #[default]
    Ignore,
    /// Skip the dispatch and log a warning the first time.
    Warn,
    /// Refuse such bindings up front and skip them at dispatch time.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderSettings {
    pub unknown_controller: UnknownControllerPolicy,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub button: ButtonSettings,
    pub stick: StickSettings,
    pub navigation: NavigationSettings,
    pub binder: BinderSettings,
}

impl InputConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: InputConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Reject values that would make controls misbehave.
    pub fn validate(&self) -> Result<()> {
        let t = self.button.press_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(InputError::invalid_config(format!(
                "button.press_threshold must be in (0, 1], got {t}"
            )));
        }
        let d = self.stick.deadzone;
        if !(0.0..1.0).contains(&d) {
            return Err(InputError::invalid_config(format!(
                "stick.deadzone must be in [0, 1), got {d}"
            )));
        }
        let n = self.stick.noise_threshold;
        if !(0.0..1.0).contains(&n) {
            return Err(InputError::invalid_config(format!(
                "stick.noise_threshold must be in [0, 1), got {n}"
            )));
        }
        if !(self.navigation.zoom_delta_threshold >= 0.0 && self.navigation.negligible_delta >= 0.0)
        {
            return Err(InputError::invalid_config(
                "navigation thresholds must be non-negative",
            ));
        }
        Ok(())
    }
}
