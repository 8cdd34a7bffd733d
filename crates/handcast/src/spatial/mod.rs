//! Spatial primitives shared by the pointer and hand tracking code
//!
//! Uses a left-handed, Y-up coordinate system:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Forward (+) / Backward (-)

mod pose;
mod quaternion;
mod vector3d;

pub use pose::Pose;
pub use quaternion::Quaternion;
pub use vector3d::Vector3D;

/// Where `value` sits between `a` and `b`, clamped to `[0, 1]`.
/// Returns 0 when the range is empty.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a != b {
        ((value - a) / (b - a)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Rescale `input` from `[min, max]` without clamping.
/// A degenerate range (`|max - min| <= f32::EPSILON`) yields 0.
pub fn normalize_range(min: f32, max: f32, input: f32) -> f32 {
    if (min - max).abs() > f32::EPSILON {
        (input - min) / (max - min)
    } else {
        0.0
    }
}

pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_lerp() {
        assert_eq!(inverse_lerp(0.0, 4.0, 1.0), 0.25);
        assert_eq!(inverse_lerp(0.0, 4.0, 9.0), 1.0);
        assert_eq!(inverse_lerp(2.0, 2.0, 9.0), 0.0);
    }

    #[test]
    fn test_normalize_range_degenerate() {
        assert_eq!(normalize_range(10.0, 10.0, 42.0), 0.0);
        assert_eq!(normalize_range(0.0, 170.0, 0.0), 0.0);
        assert!((normalize_range(0.0, 10.0, 15.0) - 1.5).abs() < 0.0001);
    }
}
