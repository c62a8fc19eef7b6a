//! Control values and the loosely typed input accepted by `set_value`.
//!
//! Native payloads are not validated upstream, so [`ControlInput`] takes
//! whatever the host hands over (a flag, a number, a string, a vector, a record,
//! a list, a wheel delta) and converts it once, at the boundary, into the
//! canonical value type of the target control. Anything that cannot be read as
//! a number becomes `0.0`.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::event::WheelEvent;

/// 2D control vector.
pub type Vec2 = Vector2<f32>;
/// 3D control vector.
pub type Vec3 = Vector3<f32>;

/// Wheel/gesture deltas. Missing fields read as `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelDelta {
    pub delta_x: f32,
    pub delta_y: f32,
    pub delta_z: f32,
}

impl WheelDelta {
    pub fn new(delta_x: f32, delta_y: f32, delta_z: f32) -> Self {
        Self {
            delta_x,
            delta_y,
            delta_z,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.delta_x == 0.0 && self.delta_y == 0.0 && self.delta_z == 0.0
    }

    fn sanitized(self) -> Self {
        Self::new(
            finite_or_zero(self.delta_x),
            finite_or_zero(self.delta_y),
            finite_or_zero(self.delta_z),
        )
    }
}

impl From<&WheelEvent> for WheelDelta {
    fn from(ev: &WheelEvent) -> Self {
        WheelDelta::new(ev.delta_x, ev.delta_y, ev.delta_z).sanitized()
    }
}

/// Current value of a control. Each control kind uses exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ControlValue {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Delta(WheelDelta),
}

impl ControlValue {
    pub fn as_scalar(&self) -> Option<f32> {
        match *self {
            ControlValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match *self {
            ControlValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match *self {
            ControlValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_delta(&self) -> Option<WheelDelta> {
        match *self {
            ControlValue::Delta(d) => Some(d),
            _ => None,
        }
    }

    /// `true` for `0.0`, the zero vectors and the zero delta.
    pub fn is_zero(&self) -> bool {
        match self {
            ControlValue::Scalar(v) => *v == 0.0,
            ControlValue::Vec2(v) => v.x == 0.0 && v.y == 0.0,
            ControlValue::Vec3(v) => v.x == 0.0 && v.y == 0.0 && v.z == 0.0,
            ControlValue::Delta(d) => d.is_zero(),
        }
    }
}

/// Anything `Control::set_value` accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlInput {
    Bool(bool),
    Number(f64),
    Text(String),
    Vector2(Vec2),
    Vector3(Vec3),
    /// An `{x, y, z}` record; absent axes are `0.0`.
    Record {
        x: Option<f32>,
        y: Option<f32>,
        z: Option<f32>,
    },
    /// Ordered components; absent axes are `0.0`.
    List(Vec<f32>),
    Delta(WheelDelta),
    Empty,
}

#[inline]
pub(crate) fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

impl ControlInput {
    /// Read as a number: flags become `1.0`/`0.0`, strings are parsed, lists
    /// use their first element. Everything else is `0.0`.
    pub fn to_scalar(&self) -> f32 {
        let v = match self {
            ControlInput::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            ControlInput::Number(n) => *n as f32,
            ControlInput::Text(s) => s.trim().parse::<f32>().unwrap_or(0.0),
            ControlInput::List(items) => items.first().copied().unwrap_or(0.0),
            ControlInput::Vector2(_)
            | ControlInput::Vector3(_)
            | ControlInput::Record { .. }
            | ControlInput::Delta(_)
            | ControlInput::Empty => 0.0,
        };
        finite_or_zero(v)
    }

    /// Read as a 3D vector. A scalar lands on the first axis.
    pub fn to_vec3(&self) -> Vec3 {
        let v = match self {
            ControlInput::Vector2(v) => Vec3::new(v.x, v.y, 0.0),
            ControlInput::Vector3(v) => *v,
            ControlInput::Record { x, y, z } => {
                Vec3::new(x.unwrap_or(0.0), y.unwrap_or(0.0), z.unwrap_or(0.0))
            }
            ControlInput::List(items) => {
                let at = |i: usize| items.get(i).copied().unwrap_or(0.0);
                Vec3::new(at(0), at(1), at(2))
            }
            ControlInput::Delta(d) => Vec3::new(d.delta_x, d.delta_y, d.delta_z),
            ControlInput::Bool(_) | ControlInput::Number(_) | ControlInput::Text(_) => {
                Vec3::new(self.to_scalar(), 0.0, 0.0)
            }
            ControlInput::Empty => Vec3::zeros(),
        };
        v.map(finite_or_zero)
    }

    pub fn to_vec2(&self) -> Vec2 {
        let v = self.to_vec3();
        Vec2::new(v.x, v.y)
    }

    /// Read as wheel deltas. Vectors map their axes onto `delta_x/y/z`.
    pub fn to_delta(&self) -> WheelDelta {
        match self {
            ControlInput::Delta(d) => d.sanitized(),
            ControlInput::Empty => WheelDelta::default(),
            _ => {
                let v = self.to_vec3();
                WheelDelta::new(v.x, v.y, v.z)
            }
        }
    }
}

impl From<bool> for ControlInput {
    fn from(v: bool) -> Self {
        ControlInput::Bool(v)
    }
}

impl From<f32> for ControlInput {
    fn from(v: f32) -> Self {
        ControlInput::Number(v as f64)
    }
}

impl From<f64> for ControlInput {
    fn from(v: f64) -> Self {
        ControlInput::Number(v)
    }
}

impl From<i32> for ControlInput {
    fn from(v: i32) -> Self {
        ControlInput::Number(v as f64)
    }
}

impl From<&str> for ControlInput {
    fn from(v: &str) -> Self {
        ControlInput::Text(v.to_owned())
    }
}

impl From<String> for ControlInput {
    fn from(v: String) -> Self {
        ControlInput::Text(v)
    }
}

impl From<Vec2> for ControlInput {
    fn from(v: Vec2) -> Self {
        ControlInput::Vector2(v)
    }
}

impl From<Vec3> for ControlInput {
    fn from(v: Vec3) -> Self {
        ControlInput::Vector3(v)
    }
}

impl From<&Vec2> for ControlInput {
    fn from(v: &Vec2) -> Self {
        ControlInput::Vector2(*v)
    }
}

impl From<&Vec3> for ControlInput {
    fn from(v: &Vec3) -> Self {
        ControlInput::Vector3(*v)
    }
}

impl From<(f32, f32)> for ControlInput {
    fn from((x, y): (f32, f32)) -> Self {
        ControlInput::Vector2(Vec2::new(x, y))
    }
}

impl From<(f32, f32, f32)> for ControlInput {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        ControlInput::Vector3(Vec3::new(x, y, z))
    }
}

impl<const N: usize> From<[f32; N]> for ControlInput {
    fn from(v: [f32; N]) -> Self {
        ControlInput::List(v.to_vec())
    }
}

impl From<&[f32]> for ControlInput {
    fn from(v: &[f32]) -> Self {
        ControlInput::List(v.to_vec())
    }
}

impl From<Vec<f32>> for ControlInput {
    fn from(v: Vec<f32>) -> Self {
        ControlInput::List(v)
    }
}

impl From<WheelDelta> for ControlInput {
    fn from(v: WheelDelta) -> Self {
        ControlInput::Delta(v)
    }
}

impl From<&WheelEvent> for ControlInput {
    fn from(ev: &WheelEvent) -> Self {
        ControlInput::Delta(WheelDelta::from(ev))
    }
}

impl From<ControlValue> for ControlInput {
    fn from(v: ControlValue) -> Self {
        match v {
            ControlValue::Scalar(s) => ControlInput::Number(s as f64),
            ControlValue::Vec2(v) => ControlInput::Vector2(v),
            ControlValue::Vec3(v) => ControlInput::Vector3(v),
            ControlValue::Delta(d) => ControlInput::Delta(d),
        }
    }
}

impl<T: Into<ControlInput>> From<Option<T>> for ControlInput {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ControlInput::Empty)
    }
}
