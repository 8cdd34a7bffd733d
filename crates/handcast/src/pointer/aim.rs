//! Where a pointer casts from, and which way

use super::frame::PointerFrame;
use crate::spatial::Vector3D;
use crate::tracking::{Finger, Handedness};

/// Produces the cast origin and direction for a frame
pub trait AimSource {
    fn origin(&self, frame: &PointerFrame<'_>) -> Vector3D;

    /// Direction to cast along, given the origin returned for the same frame
    fn direction(&self, frame: &PointerFrame<'_>, origin: Vector3D) -> Vector3D;

    /// Whether the pointer's path is meant to be drawn
    fn renders_line(&self) -> bool {
        true
    }
}

/// Cast from the attached transform along its right axis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformAim;

impl AimSource for TransformAim {
    fn origin(&self, frame: &PointerFrame<'_>) -> Vector3D {
        frame.transform.position
    }

    fn direction(&self, frame: &PointerFrame<'_>, _origin: Vector3D) -> Vector3D {
        frame.transform.right()
    }
}

/// Cast from the camera along the transform's forward axis; draws nothing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UserViewAim;

impl AimSource for UserViewAim {
    fn origin(&self, frame: &PointerFrame<'_>) -> Vector3D {
        frame.camera.position
    }

    fn direction(&self, frame: &PointerFrame<'_>, _origin: Vector3D) -> Vector3D {
        frame.transform.forward()
    }

    fn renders_line(&self) -> bool {
        false
    }
}

/// Cast from between two fingertips, away from the eye
///
/// Falls back to [`TransformAim`] while the hand is not tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchViewfinderAim {
    pub hand: Handedness,
    pub first: Finger,
    pub second: Finger,
    /// 0 puts the origin on `second`, 1 on `first`
    pub first_weight: f32,
}

impl PinchViewfinderAim {
    pub fn new(hand: Handedness) -> Self {
        Self {
            hand,
            first: Finger::Thumb,
            second: Finger::Index,
            first_weight: 0.5,
        }
    }

    pub fn with_fingers(mut self, first: Finger, second: Finger) -> Self {
        self.first = first;
        self.second = second;
        self
    }

    pub fn with_first_weight(mut self, first_weight: f32) -> Self {
        self.first_weight = first_weight;
        self
    }
}

impl AimSource for PinchViewfinderAim {
    fn origin(&self, frame: &PointerFrame<'_>) -> Vector3D {
        match frame.hand(self.hand) {
            Some(hand) => hand
                .finger_tip_world(self.second)
                .lerp(&hand.finger_tip_world(self.first), self.first_weight),
            None => TransformAim.origin(frame),
        }
    }

    fn direction(&self, frame: &PointerFrame<'_>, origin: Vector3D) -> Vector3D {
        if frame.hand(self.hand).is_none() {
            return TransformAim.direction(frame, origin);
        }
        let from_eye = (origin - frame.camera.position).normalize();
        from_eye.lerp(&frame.transform.right(), 0.5)
    }
}
