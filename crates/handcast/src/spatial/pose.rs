//! Rigid pose (position + rotation) in 3D space

use super::{Quaternion, Vector3D};
use serde::{Deserialize, Serialize};

/// A position and orientation, without scale
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector3D,
    pub rotation: Quaternion,
}

impl Pose {
    /// Identity pose (origin, no rotation)
    pub const IDENTITY: Self = Self {
        position: Vector3D::ZERO,
        rotation: Quaternion::IDENTITY,
    };

    pub fn new(position: Vector3D, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }

    /// Create a pose with just position
    pub fn from_position(position: Vector3D) -> Self {
        Self {
            position,
            rotation: Quaternion::IDENTITY,
        }
    }

    pub fn forward(&self) -> Vector3D {
        self.rotation.forward()
    }

    pub fn right(&self) -> Vector3D {
        self.rotation.right()
    }

    pub fn up(&self) -> Vector3D {
        self.rotation.up()
    }

    /// Transform a point from local space to world space
    pub fn transform_point(&self, local: Vector3D) -> Vector3D {
        self.position + self.rotation.rotate_vector(local)
    }
}
