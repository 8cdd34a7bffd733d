//! handcast: hand tracking and pointer casting for XR interaction
//!
//! This crate provides the engine-independent core of an XR interaction
//! toolkit:
//! - Spatial math (vectors, quaternions, rigid poses)
//! - Linear and gravity-curved pointer casts against a pluggable intersector
//! - Temporal path smoothing and targeted-pose evaluation
//! - Selection policies with a hysteresis dead band
//! - Hand skeleton sanitization, finger angles, grab and pinch strength
//! - Gesture classification and a provider-driven tracking session
//!
//! Everything is synchronous and driven by explicit `tick` calls.

pub mod config;
pub mod error;
pub mod pointer;
pub mod spatial;
pub mod tracking;

// Re-export commonly used types
pub use config::{HandcastConfig, PointerSettings};
pub use error::{HandcastError, Result};
pub use pointer::{
    CastConfig, InterpolationConfig, InterpolationKind, Pointer, PointerCaster, PointerFrame, PointerUpdate,
    RayHit, RayIntersector, RayKind, SelectionHysteresis, SelectionTransition, StaticScene, TargetedPose,
};
pub use spatial::{Pose, Quaternion, Vector3D};
pub use tracking::{
    gesture_from_angles, Finger, GestureType, Hand, HandTrackingSession, Handedness, ProviderRegistry,
    TrackingProvider,
};
