use cgmath::{Deg, Euler, Quaternion, Rad};
use std::fmt;

/// 3D vector as it appears in the hat database (`{ "x": .., "y": .., "z": .. }`)
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn one() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<Vector3> for cgmath::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        cgmath::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<cgmath::Vector3<f32>> for Vector3 {
    fn from(v: cgmath::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Identity rotation (w = 1)
pub fn identity_rotation() -> Quaternion<f32> {
    Quaternion::new(1.0, 0.0, 0.0, 0.0)
}

/// Build a rotation from Euler angles given in degrees, applied in X, Y, Z order.
pub fn quaternion_from_euler_degrees(degrees: Vector3) -> Quaternion<f32> {
    let euler = Euler::new(
        Rad::from(Deg(degrees.x)),
        Rad::from(Deg(degrees.y)),
        Rad::from(Deg(degrees.z)),
    );
    Quaternion::from(euler)
}
