//! Read-only inspection snapshots.
//!
//! Snapshots are **owned** copies of control, device and binding state taken
//! at a point in time, for devtools, logging and tests. Nothing here holds a
//! reference back into live state, so inspection can never mutate a control.
//!
//! # Examples
//! ```
//! use inputmap::backends::Keyboard;
//! use inputmap::event::{KeyboardEvent, NativeEvent};
//! use inputmap::snapshot::DeviceSnapshot;
//!
//! let kb = Keyboard::new("keyboard");
//! kb.handle_native(&NativeEvent::KeyDown(KeyboardEvent::new("KeyW")));
//!
//! let snap = DeviceSnapshot::of(&kb);
//! assert!(snap.is_pressed("KeyW"));
//! println!("{}", snap.to_json().unwrap());
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::binder::Binder;
use crate::binding::Binding;
use crate::control::Control;
use crate::device::{DeviceCore, Modality};
use crate::error::Result;
use crate::value::ControlValue;

/// State of one control.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControlSnapshot {
    pub name: String,
    pub kind: &'static str,
    pub value: ControlValue,
    pub old_value: Option<ControlValue>,
    pub pressed: bool,
}

impl ControlSnapshot {
    pub fn of(control: &Control) -> Self {
        Self {
            name: control.name().to_owned(),
            kind: control.kind().label(),
            value: control.value(),
            old_value: control.old_value(),
            pressed: control.is_pressed(),
        }
    }
}

/// State of one device and all its controls.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    pub name: String,
    pub modality: Modality,
    pub observing: bool,
    /// Pressed control names, sorted.
    pub pressed: Vec<String>,
    pub controls: BTreeMap<String, ControlSnapshot>,
}

impl DeviceSnapshot {
    pub fn of(device: &DeviceCore) -> Self {
        Self {
            name: device.name().to_owned(),
            modality: device.modality(),
            observing: device.is_observing(),
            pressed: device.pressed(),
            controls: device
                .controls()
                .iter()
                .map(|c| (c.name().to_owned(), ControlSnapshot::of(c)))
                .collect(),
        }
    }

    #[inline]
    pub fn control(&self, name: &str) -> Option<&ControlSnapshot> {
        self.controls.get(name)
    }

    #[inline]
    pub fn is_pressed(&self, name: &str) -> bool {
        self.pressed.iter().any(|p| p == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A binder's bindings, grouped both ways.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BindingSnapshot {
    pub by_action: BTreeMap<String, Vec<Binding>>,
    pub by_device: BTreeMap<String, Vec<Binding>>,
}

impl BindingSnapshot {
    pub fn of(binder: &Binder) -> Self {
        Self {
            by_action: binder.bindings_by_action(),
            by_device: binder.bindings_by_device(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Owned snapshot of several devices (`device name → DeviceSnapshot`).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot(pub BTreeMap<String, DeviceSnapshot>);

impl Snapshot {
    /// Get the state for a specific device.
    #[inline]
    pub fn get(&self, device: &str) -> Option<&DeviceSnapshot> {
        self.0.get(device)
    }

    /// Iterate `(device name, state)` pairs in name order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DeviceSnapshot)> {
        self.0.iter()
    }

    /// Consume the snapshot and return the inner map.
    #[inline]
    pub fn into_inner(self) -> BTreeMap<String, DeviceSnapshot> {
        self.0
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
