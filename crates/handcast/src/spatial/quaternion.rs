//! Quaternion representation for 3D rotations

use super::Vector3D;
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Below this, `1 - |dot|` is treated as "same rotation" by [`Quaternion::angle_degrees`]
const ANGLE_EPSILON: f32 = 1e-6;

/// A quaternion for representing 3D rotations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a new quaternion
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create a quaternion from axis-angle representation
    pub fn from_axis_angle(axis: Vector3D, angle_radians: f32) -> Self {
        let half_angle = angle_radians / 2.0;
        let sin_half = half_angle.sin();
        let normalized = axis.normalize();

        Self {
            x: normalized.x * sin_half,
            y: normalized.y * sin_half,
            z: normalized.z * sin_half,
            w: half_angle.cos(),
        }
    }

    /// Shortest-arc rotation carrying direction `from` onto direction `to`
    pub fn from_to_rotation(from: Vector3D, to: Vector3D) -> Self {
        let from = from.normalize();
        let to = to.normalize();
        if from == Vector3D::ZERO || to == Vector3D::ZERO {
            return Self::IDENTITY;
        }

        let dot = from.dot(&to).clamp(-1.0, 1.0);
        if dot > 1.0 - ANGLE_EPSILON {
            return Self::IDENTITY;
        }
        if dot < -1.0 + ANGLE_EPSILON {
            // Opposite directions: any perpendicular axis works
            let mut axis = Vector3D::RIGHT.cross(&from);
            if axis.magnitude_squared() < 1e-6 {
                axis = Vector3D::UP.cross(&from);
            }
            return Self::from_axis_angle(axis, std::f32::consts::PI);
        }

        let axis = from.cross(&to);
        Self::new(axis.x, axis.y, axis.z, 1.0 + dot).normalize()
    }

    /// Get the magnitude of the quaternion
    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Four-component dot product
    pub fn dot(&self, other: &Quaternion) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Normalize the quaternion
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
                z: self.z / mag,
                w: self.w / mag,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Get the inverse of the quaternion
    pub fn inverse(&self) -> Self {
        let mag_sq = self.dot(self);
        if mag_sq > 0.0 {
            let inv_mag_sq = 1.0 / mag_sq;
            Self {
                x: -self.x * inv_mag_sq,
                y: -self.y * inv_mag_sq,
                z: -self.z * inv_mag_sq,
                w: self.w * inv_mag_sq,
            }
        } else {
            Self::IDENTITY
        }
    }

    /// Angle in degrees between two rotations.
    ///
    /// Matches the usual engine convention: `acos(min(|dot|, 1)) * 2`, and
    /// exactly zero when the rotations are within [`ANGLE_EPSILON`].
    pub fn angle_degrees(&self, other: &Quaternion) -> f32 {
        let dot = self.dot(other).abs().min(1.0);
        if dot > 1.0 - ANGLE_EPSILON {
            0.0
        } else {
            (dot.acos() * 2.0).to_degrees()
        }
    }

    /// True if any component is NaN
    pub fn has_nan(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan() || self.w.is_nan()
    }

    /// Rotate a vector by this quaternion
    pub fn rotate_vector(&self, v: Vector3D) -> Vector3D {
        let q_vec = Vector3D::new(self.x, self.y, self.z);
        let uv = q_vec.cross(&v);
        let uuv = q_vec.cross(&uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Get the forward vector (where this rotation points)
    pub fn forward(&self) -> Vector3D {
        self.rotate_vector(Vector3D::FORWARD)
    }

    /// Get the right vector
    pub fn right(&self) -> Vector3D {
        self.rotate_vector(Vector3D::RIGHT)
    }

    /// Get the up vector
    pub fn up(&self) -> Vector3D {
        self.rotate_vector(Vector3D::UP)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Self) -> Self::Output {
        Quaternion::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl Mul<Vector3D> for Quaternion {
    type Output = Vector3D;

    fn mul(self, rhs: Vector3D) -> Self::Output {
        self.rotate_vector(rhs)
    }
}
