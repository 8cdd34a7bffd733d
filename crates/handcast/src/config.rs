//! TOML configuration for pointers, tracking and calibration
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! [pointer]
//! ray_kind = "linear"
//! max_distance = 40.0
//! interpolation = "sine"
//!
//! [tracking]
//! verbose = true
//!
//! [calibration]
//! index = [41.0, 170.0]
//! pinch = [0.04, 0.16]
//! ```

use crate::error::{HandcastError, Result};
use crate::pointer::cast::{CastConfig, RayKind, FALLBACK_MAX_DISTANCE};
use crate::pointer::interpolation::{InterpolationConfig, InterpolationKind, SampledCurve};
use crate::pointer::ray::LayerMask;
use crate::pointer::selection::{
    SelectionHysteresis, DEFAULT_CONFIDENCE_INTERVAL, DEFAULT_GRAB_THRESHOLD, DEFAULT_PINCH_TRIGGER_DISTANCE,
};
use crate::spatial::Vector3D;
use crate::tracking::{FingerCalibration, Finger, TrackingSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pointer casting, smoothing and selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerSettings {
    #[serde(default)]
    pub ray_kind: RayKind,

    /// Sub-steps per unit of distance
    #[serde(default = "default_smoothness")]
    pub smoothness: i32,

    #[serde(default = "default_max_distance")]
    pub max_distance: f32,

    #[serde(default = "default_gravity_direction")]
    pub gravity_direction: Vector3D,

    #[serde(default = "default_gravity_multiplier")]
    pub gravity_multiplier: f32,

    #[serde(default)]
    pub layer_mask: LayerMask,

    #[serde(default)]
    pub starting_offset: Vector3D,

    #[serde(default)]
    pub interpolation: InterpolationKind,

    /// Keys for the custom interpolation curve
    #[serde(default)]
    pub curve: SampledCurve,

    #[serde(default = "default_confidence_interval")]
    pub confidence_interval: f32,

    #[serde(default = "default_grab_threshold")]
    pub grab_threshold: f32,

    /// Fingertip distance in metres for pinch-viewfinder selection
    #[serde(default = "default_pinch_trigger_distance")]
    pub pinch_trigger_distance: f32,
}

fn default_smoothness() -> i32 {
    1
}

fn default_max_distance() -> f32 {
    100.0
}

fn default_gravity_direction() -> Vector3D {
    Vector3D::DOWN
}

fn default_gravity_multiplier() -> f32 {
    2.0
}

fn default_confidence_interval() -> f32 {
    DEFAULT_CONFIDENCE_INTERVAL
}

fn default_grab_threshold() -> f32 {
    DEFAULT_GRAB_THRESHOLD
}

fn default_pinch_trigger_distance() -> f32 {
    DEFAULT_PINCH_TRIGGER_DISTANCE
}

impl Default for PointerSettings {
    fn default() -> Self {
        Self {
            ray_kind: RayKind::default(),
            smoothness: default_smoothness(),
            max_distance: default_max_distance(),
            gravity_direction: default_gravity_direction(),
            gravity_multiplier: default_gravity_multiplier(),
            layer_mask: LayerMask::default(),
            starting_offset: Vector3D::ZERO,
            interpolation: InterpolationKind::default(),
            curve: SampledCurve::default(),
            confidence_interval: default_confidence_interval(),
            grab_threshold: default_grab_threshold(),
            pinch_trigger_distance: default_pinch_trigger_distance(),
        }
    }
}

impl PointerSettings {
    /// Cast parameters; max distance is limited to `[0, 500]`
    pub fn cast_config(&self) -> CastConfig {
        CastConfig {
            ray_kind: self.ray_kind,
            smoothness: self.smoothness,
            max_distance: self.max_distance.clamp(0.0, FALLBACK_MAX_DISTANCE),
            gravity_direction: self.gravity_direction,
            gravity_magnitude: self.gravity_multiplier,
            layer_mask: self.layer_mask,
        }
    }

    pub fn interpolation_config(&self) -> InterpolationConfig {
        InterpolationConfig {
            kind: self.interpolation,
            curve: self.curve.clone(),
        }
    }

    pub fn hysteresis(&self) -> SelectionHysteresis {
        SelectionHysteresis::new(self.confidence_interval)
    }
}

/// Top-level configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandcastConfig {
    #[serde(default)]
    pub pointer: PointerSettings,

    #[serde(default)]
    pub tracking: TrackingSettings,

    #[serde(default)]
    pub calibration: FingerCalibration,
}

impl HandcastConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| HandcastError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded handcast config from {}", path.display());
        Ok(config)
    }

    /// Reject values the runtime fallbacks cannot make sense of
    pub fn validate(&self) -> Result<()> {
        let pointer = &self.pointer;

        if !(0.0..=1.0).contains(&pointer.confidence_interval) {
            return Err(HandcastError::InvalidConfig(format!(
                "pointer.confidence_interval must be within [0, 1], got {}",
                pointer.confidence_interval
            )));
        }
        if pointer.grab_threshold.is_nan() {
            return Err(HandcastError::InvalidConfig(
                "pointer.grab_threshold must be a number".to_string(),
            ));
        }
        if pointer.pinch_trigger_distance.is_nan() || pointer.pinch_trigger_distance < 0.0 {
            return Err(HandcastError::InvalidConfig(format!(
                "pointer.pinch_trigger_distance must be non-negative, got {}",
                pointer.pinch_trigger_distance
            )));
        }
        if pointer.gravity_direction.has_nan() || pointer.gravity_multiplier.is_nan() {
            return Err(HandcastError::InvalidConfig(
                "pointer gravity must not contain NaN".to_string(),
            ));
        }

        let calibration = &self.calibration;
        let norms = Finger::ALL
            .iter()
            .map(|finger| (format!("{:?}", finger).to_lowercase(), calibration.finger(*finger)))
            .chain(std::iter::once(("pinch".to_string(), calibration.pinch)));
        for (name, norm) in norms {
            if norm.min.is_nan() || norm.max.is_nan() {
                return Err(HandcastError::InvalidConfig(format!(
                    "calibration.{} must not contain NaN",
                    name
                )));
            }
        }

        Ok(())
    }
}
