//! Declarative bindings from control events to named actions.
//!
//! A [`Binding`] names a device, one control (or an ordered list of controls
//! for a composite combo), the control event it reacts to, and the action to
//! dispatch. Bindings are plain data; the [`Binder`](crate::binder::Binder)
//! evaluates them against live notifications.
//!
//! Profiles round-trip through TOML:
//!
//! ```toml
//! name = "default"
//!
//! [[bindings]]
//! action = "jump"
//! device = "keyboard"
//! control = "Space"
//! event = "pressed"
//!
//! [[bindings]]
//! action = "save"
//! device = "keyboard"
//! control = ["ControlLeft", "KeyS"]
//! controller = "editor"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::event::ControlEventKind;

/// Control event a binding reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingEvent {
    #[default]
    Pressed,
    Released,
    /// Any value update.
    Changed,
}

impl BindingEvent {
    pub fn matches(self, kind: ControlEventKind) -> bool {
        matches!(
            (self, kind),
            (BindingEvent::Pressed, ControlEventKind::Pressed)
                | (BindingEvent::Released, ControlEventKind::Released)
                | (BindingEvent::Changed, ControlEventKind::Updated)
        )
    }
}

/// One control, or an ordered set of controls that must be satisfied together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingControls {
    Single(String),
    Composite(Vec<String>),
}

/// Maps a control event on a device to a named action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    #[serde(rename = "action")]
    pub action_name: String,
    #[serde(rename = "device")]
    pub device_name: String,
    pub control: BindingControls,
    #[serde(rename = "event", default)]
    pub event_type: BindingEvent,
    /// Dispatch target; `None` dispatches unscoped.
    #[serde(rename = "controller", default, skip_serializing_if = "Option::is_none")]
    pub controller_name: Option<String>,
}

impl Binding {
    pub fn new(
        action: impl Into<String>,
        device: impl Into<String>,
        control: impl Into<String>,
        event: BindingEvent,
    ) -> Self {
        Self {
            action_name: action.into(),
            device_name: device.into(),
            control: BindingControls::Single(control.into()),
            event_type: event,
            controller_name: None,
        }
    }

    /// A combo: fires only when every control satisfies `event` at once.
    pub fn composite<I, S>(
        action: impl Into<String>,
        device: impl Into<String>,
        controls: I,
        event: BindingEvent,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action_name: action.into(),
            device_name: device.into(),
            control: BindingControls::Composite(controls.into_iter().map(Into::into).collect()),
            event_type: event,
            controller_name: None,
        }
    }

    pub fn for_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller_name = Some(controller.into());
        self
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.control, BindingControls::Composite(_))
    }

    /// Constituent control names, in declaration order.
    pub fn control_names(&self) -> &[String] {
        match &self.control {
            BindingControls::Single(name) => std::slice::from_ref(name),
            BindingControls::Composite(names) => names,
        }
    }

    /// Whether a notification from `device`/`control` concerns this binding.
    pub fn references(&self, device: &str, control: &str) -> bool {
        self.device_name == device && self.control_names().iter().any(|c| c == control)
    }

    /// Composites need at least one control.
    pub fn validate(&self) -> Result<()> {
        if self.control_names().is_empty() {
            return Err(InputError::EmptyBinding {
                action: self.action_name.clone(),
            });
        }
        Ok(())
    }
}

/// Named, serializable set of bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

impl BindingProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_binding(mut self, binding: Binding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Parse and validate a TOML profile.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let profile: Self = toml::from_str(text)?;
        for binding in &profile.bindings {
            binding.validate()?;
        }
        Ok(profile)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
