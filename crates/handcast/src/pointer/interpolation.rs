//! Temporal smoothing of cast paths
//!
//! Each tick's raw path is blended horizontally toward the previous tick's
//! smoothed path. Heights are never blended, so the path keeps following
//! terrain while sideways wobble is damped.

use super::cast::RayPath;
use crate::spatial::{inverse_lerp, Vector3D};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Global damping applied on top of every blend factor
const BLEND_DAMPING: f32 = 0.9;

/// Blend profile along the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationKind {
    /// No temporal blending
    None,
    #[default]
    Linear,
    Exponential,
    Sine,
    /// Evaluate [`InterpolationConfig::curve`]
    Custom,
}

/// A keyframe of a [`SampledCurve`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

/// Piecewise-linear curve through sorted keys, flat beyond the ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct SampledCurve {
    keys: Vec<CurveKey>,
}

impl SampledCurve {
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.retain(|k| !k.time.is_nan());
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Build from `(time, value)` pairs
    pub fn from_pairs(pairs: &[(f32, f32)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(time, value)| CurveKey { time, value })
                .collect(),
        )
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// An empty curve evaluates to 0 everywhere
    pub fn evaluate(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        // NaN lands here too
        if !(time > first.time) {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let upper = self.keys.partition_point(|k| k.time <= time);
        let a = &self.keys[upper - 1];
        let b = &self.keys[upper];
        let t = inverse_lerp(a.time, b.time, time);
        a.value + (b.value - a.value) * t
    }
}

impl From<Vec<CurveKey>> for SampledCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl From<SampledCurve> for Vec<CurveKey> {
    fn from(curve: SampledCurve) -> Self {
        curve.keys
    }
}

/// How raw paths blend with the previous path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    #[serde(default)]
    pub kind: InterpolationKind,
    /// Only read for [`InterpolationKind::Custom`]
    #[serde(default)]
    pub curve: SampledCurve,
}

impl InterpolationConfig {
    pub fn new(kind: InterpolationKind) -> Self {
        Self {
            kind,
            curve: SampledCurve::default(),
        }
    }

    pub fn custom(curve: SampledCurve) -> Self {
        Self {
            kind: InterpolationKind::Custom,
            curve,
        }
    }

    /// Blend factor for path position `t` in `[0, 1)`, before damping
    pub fn blend_factor(&self, t: f32) -> f32 {
        match self.kind {
            InterpolationKind::None => 0.0,
            InterpolationKind::Linear => t,
            InterpolationKind::Exponential => t * t,
            InterpolationKind::Sine => (t * PI).sin() * 0.9,
            InterpolationKind::Custom => self.curve.evaluate(t),
        }
    }
}

/// Owns the previous smoothed path of one pointer
#[derive(Debug, Clone, Default)]
pub struct PathSmoother {
    previous: Vec<Vector3D>,
}

impl PathSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last smoothed path, empty before the first call
    pub fn previous(&self) -> &[Vector3D] {
        &self.previous
    }

    /// Forget history so the next call seeds again
    pub fn reset(&mut self) {
        self.previous.clear();
    }

    /// Blend `raw` against the previous path and remember the result
    pub fn interpolate(&mut self, raw: &RayPath, config: &InterpolationConfig) -> &[Vector3D] {
        let count = raw.len();

        if self.previous.is_empty() {
            // Seed with a slight per-index lift so the first blend is not flat
            self.previous = raw
                .points()
                .iter()
                .enumerate()
                .map(|(i, p)| *p + Vector3D::UP * inverse_lerp(0.0, count as f32, i as f32))
                .collect();
        }

        let length = count as f32;
        let smoothed: Vec<Vector3D> = raw
            .points()
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let factor = config.blend_factor(i as f32 / length) * BLEND_DAMPING;
                let target = match self.previous.len() {
                    0 => *point,
                    n => self.previous[i.min(n - 1)],
                };
                let blended = point.lerp(&target, factor);
                Vector3D::new(blended.x, point.y, blended.z)
            })
            .collect();

        self.previous = smoothed;
        &self.previous
    }
}
