//! Error types.
//!
//! Input handling itself never fails: `set_value`, native event handling and
//! binding resolution coerce or ignore what they cannot use. [`InputError`] is
//! reserved for construction and configuration mistakes, which should surface
//! loudly and early.

use thiserror::Error;

/// Errors raised while building devices, bindings, or configuration.
#[derive(Error, Debug)]
pub enum InputError {
    /// A control with this name is already registered on the device.
    #[error("control `{control}` is already registered on device `{device}`")]
    DuplicateControl { device: String, control: String },

    /// The control was created for (or added to) another device.
    #[error("control `{control}` already belongs to device `{owner}`")]
    ControlOwned { control: String, owner: String },

    /// A device with this name is already managed.
    #[error("device `{0}` is already registered")]
    DuplicateDevice(String),

    /// A composite binding was declared without constituent controls.
    #[error("binding for action `{action}` has no controls")]
    EmptyBinding { action: String },

    /// Strict controller policy: the dispatcher does not know this controller.
    #[error("binding for action `{action}` targets unknown controller `{controller}`")]
    UnknownController { action: String, controller: String },

    /// A configuration value is outside its allowed range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("failed to write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, InputError>;

impl InputError {
    /// Create an [`InputError::InvalidConfig`] with a descriptive message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
