//! Tracking provider abstraction
//!
//! A provider is one source of hand data: a headset runtime, a glove, a
//! camera SDK, or a scripted emulator. Providers report either full skeletons
//! or precomputed gestures; the session decides which to use each tick.

use super::hand::HandGesture;
use crate::error::Result;
use crate::spatial::{Pose, Quaternion};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Broad class of tracking hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Headset,
    Glove,
    Camera,
    /// Simulated input, no hardware
    Emulator,
}

/// Provider metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// Unique provider identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    pub device_class: DeviceClass,
    pub description: String,
}

impl ProviderMetadata {
    pub fn new(id: impl Into<String>, name: impl Into<String>, device_class: DeviceClass) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            device_class,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One hand's skeleton as reported by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonSample {
    pub root: Pose,
    /// Local bone rotations in canonical bone order; may contain NaN
    pub rotations: Vec<Quaternion>,
    pub confidence: f32,
}

impl SkeletonSample {
    pub fn new(root: Pose, rotations: Vec<Quaternion>, confidence: f32) -> Self {
        Self {
            root,
            rotations,
            confidence,
        }
    }
}

/// Skeletons for both hands; `None` means the hand is not tracked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonFrame {
    pub left: Option<SkeletonSample>,
    pub right: Option<SkeletonSample>,
}

/// Precomputed gesture data for both hands; `None` means not tracked
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureFrame {
    pub left: Option<HandGesture>,
    pub right: Option<HandGesture>,
}

/// A source of hand tracking data
pub trait TrackingProvider: Send {
    fn metadata(&self) -> &ProviderMetadata;

    /// Called once after registration
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the session shuts down
    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether the device is currently connected
    fn is_present(&self) -> bool;

    /// Whether [`skeleton`](Self::skeleton) yields data
    fn can_have_skeleton(&self) -> bool;

    /// Skeleton data relative to the given camera pose
    fn skeleton(&mut self, camera: &Pose) -> Result<SkeletonFrame>;

    /// Gesture data relative to the given camera pose
    fn gesture(&mut self, camera: &Pose) -> Result<GestureFrame>;
}

/// Replays queued frames in order, then holds the last one.
///
/// Stands in for a real device in tests and the demo.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    metadata: ProviderMetadata,
    skeletons: VecDeque<SkeletonFrame>,
    gestures: VecDeque<GestureFrame>,
    last_skeleton: SkeletonFrame,
    last_gesture: GestureFrame,
    present: bool,
}

impl ScriptedProvider {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            metadata: ProviderMetadata::new(id.clone(), id, DeviceClass::Emulator)
                .with_description("Replays scripted hand frames"),
            skeletons: VecDeque::new(),
            gestures: VecDeque::new(),
            last_skeleton: SkeletonFrame::default(),
            last_gesture: GestureFrame::default(),
            present: true,
        }
    }

    pub fn with_skeletons(mut self, frames: impl IntoIterator<Item = SkeletonFrame>) -> Self {
        self.skeletons.extend(frames);
        self
    }

    pub fn with_gestures(mut self, frames: impl IntoIterator<Item = GestureFrame>) -> Self {
        self.gestures.extend(frames);
        self
    }

    pub fn set_present(&mut self, present: bool) {
        self.present = present;
    }

    /// Frames not yet replayed
    pub fn remaining(&self) -> usize {
        self.skeletons.len() + self.gestures.len()
    }
}

impl TrackingProvider for ScriptedProvider {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    fn is_present(&self) -> bool {
        self.present
    }

    fn can_have_skeleton(&self) -> bool {
        !self.skeletons.is_empty() || self.last_skeleton != SkeletonFrame::default()
    }

    fn skeleton(&mut self, _camera: &Pose) -> Result<SkeletonFrame> {
        if let Some(frame) = self.skeletons.pop_front() {
            self.last_skeleton = frame;
        }
        Ok(self.last_skeleton.clone())
    }

    fn gesture(&mut self, _camera: &Pose) -> Result<GestureFrame> {
        if let Some(frame) = self.gestures.pop_front() {
            self.last_gesture = frame;
        }
        Ok(self.last_gesture.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::gesture::GestureType;

    #[test]
    fn test_scripted_provider_replays_then_holds() {
        let sample = SkeletonSample::new(Pose::IDENTITY, vec![Quaternion::IDENTITY; 22], 0.8);
        let mut provider = ScriptedProvider::new("script").with_skeletons(vec![
            SkeletonFrame {
                left: Some(sample.clone()),
                right: None,
            },
            SkeletonFrame {
                left: None,
                right: Some(sample.clone()),
            },
        ]);
        assert!(provider.can_have_skeleton());
        assert_eq!(provider.remaining(), 2);

        let first = provider.skeleton(&Pose::IDENTITY).unwrap();
        assert!(first.left.is_some() && first.right.is_none());
        let second = provider.skeleton(&Pose::IDENTITY).unwrap();
        assert!(second.right.is_some());
        let held = provider.skeleton(&Pose::IDENTITY).unwrap();
        assert_eq!(held, second);
        assert!(provider.can_have_skeleton());
    }

    #[test]
    fn test_gesture_only_provider() {
        let mut provider = ScriptedProvider::new("gestures").with_gestures(vec![GestureFrame {
            left: Some(HandGesture {
                gesture: GestureType::Like,
                ..HandGesture::default()
            }),
            right: None,
        }]);
        assert!(!provider.can_have_skeleton());
        let frame = provider.gesture(&Pose::IDENTITY).unwrap();
        assert_eq!(frame.left.map(|g| g.gesture), Some(GestureType::Like));
        assert_eq!(provider.metadata().device_class, DeviceClass::Emulator);
    }
}
