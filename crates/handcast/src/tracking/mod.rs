//! Hand tracking: skeletons, strengths, gestures and provider sessions

pub mod bones;
pub mod gesture;
pub mod hand;
pub mod provider;
pub mod session;
pub mod skeleton;

pub use bones::{Finger, HandBone, Handedness, BONE_COUNT, TRACKED_BONE_COUNT};
pub use gesture::{gesture_from_angles, GestureClassifier, GestureSignature, GestureType};
pub use hand::{FingerCalibration, FingerNorm, Hand, HandGesture, HandState};
pub use provider::{
    DeviceClass, GestureFrame, ProviderMetadata, ScriptedProvider, SkeletonFrame, SkeletonSample,
    TrackingProvider,
};
pub use session::{HandTrackingSession, ProviderRegistry, ProviderState, TrackingOutcome, TrackingSettings};
pub use skeleton::{HandSkeleton, RestPose};
