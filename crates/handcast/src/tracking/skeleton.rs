//! Hand skeleton snapshots and the rest pose they are measured against

use super::bones::{Finger, HandBone, BONES_PER_FINGER, BONE_COUNT, TRACKED_BONE_COUNT};
use crate::error::{HandcastError, Result};
use crate::spatial::{Pose, Quaternion, Vector3D};

/// Rest pose captured once per hand model.
///
/// Offsets are each bone's position relative to its parent; they drive the
/// fingertip forward kinematics. Rotations are the fallback for NaN input.
#[derive(Debug, Clone, PartialEq)]
pub struct RestPose {
    offsets: [Vector3D; BONE_COUNT],
    rotations: [Quaternion; BONE_COUNT],
}

impl RestPose {
    /// Build from explicit tables. The thumb metacarpal is forced to a zero
    /// offset and identity rotation, as hand rigs have no such joint.
    pub fn new(offsets: [Vector3D; BONE_COUNT], rotations: [Quaternion; BONE_COUNT]) -> Self {
        let mut pose = Self { offsets, rotations };
        pose.offsets[HandBone::ThumbMetacarpal.index()] = Vector3D::ZERO;
        pose.rotations[HandBone::ThumbMetacarpal.index()] = Quaternion::IDENTITY;
        pose
    }

    /// Straight, flat hand with fingers along +X, in metres
    pub fn reference() -> Self {
        let mut offsets = [Vector3D::ZERO; BONE_COUNT];
        offsets[HandBone::Palm.index()] = Vector3D::new(0.03, 0.0, 0.0);

        // (metacarpal offset from palm, bone axis, phalanx lengths proximal/middle/distal/tip)
        let layout: [(Vector3D, Vector3D, [f32; 4]); 5] = [
            (Vector3D::ZERO, Vector3D::FORWARD, [0.0, 0.035, 0.032, 0.025]),
            (Vector3D::new(0.0, 0.0, 0.025), Vector3D::RIGHT, [0.07, 0.04, 0.025, 0.02]),
            (Vector3D::new(0.0, 0.0, 0.005), Vector3D::RIGHT, [0.07, 0.045, 0.03, 0.022]),
            (Vector3D::new(0.0, 0.0, -0.015), Vector3D::RIGHT, [0.065, 0.04, 0.028, 0.02]),
            (Vector3D::new(0.0, 0.0, -0.033), Vector3D::RIGHT, [0.06, 0.032, 0.02, 0.018]),
        ];

        for (finger, (base, axis, lengths)) in Finger::ALL.iter().zip(layout) {
            let first = finger.first_bone();
            offsets[first] = base;
            for (step, length) in lengths[..3].iter().enumerate() {
                offsets[first + 1 + step] = axis * *length;
            }
            offsets[finger.tip()] = axis * lengths[3];
        }
        // Thumb root sits beside the index knuckle, splayed toward +Z
        offsets[Finger::Thumb.first_bone() + 1] = Vector3D::new(0.02, 0.0, 0.04);

        Self::new(offsets, [Quaternion::IDENTITY; BONE_COUNT])
    }

    pub fn offset(&self, bone: usize) -> Vector3D {
        self.offsets[bone]
    }

    pub fn rotation(&self, bone: usize) -> Quaternion {
        self.rotations[bone]
    }
}

impl Default for RestPose {
    fn default() -> Self {
        Self::reference()
    }
}

/// Per-bone local rotations of one tracked hand plus its root pose
#[derive(Debug, Clone, PartialEq)]
pub struct HandSkeleton {
    rotations: [Quaternion; TRACKED_BONE_COUNT],
    pub root: Pose,
}

impl Default for HandSkeleton {
    fn default() -> Self {
        Self {
            rotations: [Quaternion::IDENTITY; TRACKED_BONE_COUNT],
            root: Pose::IDENTITY,
        }
    }
}

impl HandSkeleton {
    /// Copy provider data, replacing any rotation containing NaN by the rest
    /// rotation for that bone, or identity when the rest rotation is NaN too.
    ///
    /// Extra trailing rotations are ignored; fewer than
    /// [`TRACKED_BONE_COUNT`] is a [`HandcastError::SkeletonTooShort`].
    pub fn sanitized(input: &[Quaternion], root: Pose, rest: &RestPose) -> Result<Self> {
        if input.len() < TRACKED_BONE_COUNT {
            return Err(HandcastError::SkeletonTooShort {
                expected: TRACKED_BONE_COUNT,
                actual: input.len(),
            });
        }

        let mut rotations = [Quaternion::IDENTITY; TRACKED_BONE_COUNT];
        for (i, slot) in rotations.iter_mut().enumerate() {
            let incoming = input[i];
            *slot = if !incoming.has_nan() {
                incoming
            } else if !rest.rotation(i).has_nan() {
                rest.rotation(i)
            } else {
                Quaternion::IDENTITY
            };
        }

        Ok(Self { rotations, root })
    }

    pub fn rotation(&self, bone: usize) -> Quaternion {
        self.rotations[bone]
    }

    pub fn rotations(&self) -> &[Quaternion; TRACKED_BONE_COUNT] {
        &self.rotations
    }

    /// Fingertip position in hand space.
    ///
    /// Walks from the tip back to the metacarpal, nesting each bone's
    /// rotation around the accumulated child offset:
    /// `tip = offset[b] + rotation[b] * tip`.
    pub fn finger_tip_position(&self, finger: Finger, rest: &RestPose) -> Vector3D {
        let first = finger.first_bone();
        let mut tip = rest.offset(finger.tip());
        for bone in (first..first + BONES_PER_FINGER).rev() {
            tip = rest.offset(bone) + self.rotations[bone] * tip;
        }
        tip
    }

    /// Summed joint angles (degrees) over the finger's three joint pairs
    pub fn finger_curl_degrees(&self, finger: Finger) -> f32 {
        let first = finger.first_bone();
        (first..first + BONES_PER_FINGER - 1)
            .map(|bone| self.rotations[bone].angle_degrees(&self.rotations[bone + 1]))
            .sum()
    }
}
