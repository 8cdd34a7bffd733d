use crate::spatial::Pose;
use crate::tracking::{HandTrackingSession, Hand, Handedness};

/// Everything a pointer reads during one tick
#[derive(Debug, Clone, Copy)]
pub struct PointerFrame<'a> {
    /// World pose of the object the pointer is attached to
    pub transform: Pose,
    /// World pose of the user's head/camera
    pub camera: Pose,
    pub fixed_delta_time: f32,
    pub left: Option<&'a Hand>,
    pub right: Option<&'a Hand>,
    /// Analog input for [`ExternalSelection`](super::ExternalSelection)
    pub external_value: f32,
}

impl<'a> PointerFrame<'a> {
    pub fn new(transform: Pose, camera: Pose, fixed_delta_time: f32) -> Self {
        Self {
            transform,
            camera,
            fixed_delta_time,
            left: None,
            right: None,
            external_value: 0.0,
        }
    }

    /// Frame with both hands borrowed from a tracking session
    pub fn from_session(
        session: &'a HandTrackingSession,
        transform: Pose,
        camera: Pose,
        fixed_delta_time: f32,
    ) -> Self {
        Self::new(transform, camera, fixed_delta_time).with_hands(Some(session.left()), Some(session.right()))
    }

    pub fn with_hands(mut self, left: Option<&'a Hand>, right: Option<&'a Hand>) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    pub fn with_external_value(mut self, value: f32) -> Self {
        self.external_value = value;
        self
    }

    /// The requested hand, only while it is actively tracked
    pub fn hand(&self, handedness: Handedness) -> Option<&'a Hand> {
        let hand = match handedness {
            Handedness::Left => self.left,
            Handedness::Right => self.right,
        };
        hand.filter(|hand| hand.is_active)
    }
}
