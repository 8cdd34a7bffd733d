//! Pointers: cast a path into the scene, smooth it, and select along it
//!
//! A [`Pointer`] combines an [`AimSource`] (where to cast from), a
//! [`PointerCaster`] (how to cast and smooth) and an optional
//! [`SelectionStrategy`] (when the user means "this one").

pub mod aim;
pub mod cast;
pub mod caster;
pub mod frame;
pub mod interpolation;
pub mod ray;
pub mod selection;

pub use aim::{AimSource, PinchViewfinderAim, TransformAim, UserViewAim};
pub use cast::{
    cast, curved_cast, linear_cast, CastConfig, CastResult, CastStrategy, RayKind, RayPath,
    FALLBACK_MAX_DISTANCE, FALLBACK_SMOOTHNESS,
};
pub use caster::{Pointer, PointerCaster, PointerUpdate, TargetedPose};
pub use frame::PointerFrame;
pub use interpolation::{CurveKey, InterpolationConfig, InterpolationKind, PathSmoother, SampledCurve};
pub use ray::{Aabb, LayerMask, Plane, RayHit, RayIntersector, Shape, StaticScene};
pub use selection::{
    ExternalSelection, GrabSelection, PinchViewfinderSelection, SelectionHysteresis, SelectionState,
    SelectionStrategy, SelectionTransition,
};
