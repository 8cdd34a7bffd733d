//! Path casting: linear and gravity-curved sweeps
//!
//! A cast walks a cursor from the origin in small steps, testing each
//! sub-segment against a [`RayIntersector`]. The visited points form the raw
//! [`RayPath`] that is later smoothed and rendered.

use super::ray::{LayerMask, RayHit, RayIntersector};
use crate::spatial::Vector3D;
use serde::{Deserialize, Serialize};

/// Distance used when the configured one is non-positive, NaN or infinite
pub const FALLBACK_MAX_DISTANCE: f32 = 500.0;

/// Smoothness used when the configured one is not positive
pub const FALLBACK_SMOOTHNESS: i32 = 1;

/// Shape of the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RayKind {
    /// Delegates to the installed [`CastStrategy`], or Linear without one
    Custom,
    Linear,
    #[default]
    Curved,
}

/// Ordered points of a candidate trajectory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RayPath(pub Vec<Vector3D>);

impl RayPath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn points(&self) -> &[Vector3D] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<Vector3D> {
        self.0.last().copied()
    }
}

impl From<Vec<Vector3D>> for RayPath {
    fn from(points: Vec<Vector3D>) -> Self {
        Self(points)
    }
}

/// Per-invocation cast parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastConfig {
    pub ray_kind: RayKind,
    /// Sub-steps per unit of distance
    pub smoothness: i32,
    pub max_distance: f32,
    /// Curved only
    pub gravity_direction: Vector3D,
    /// Curved only
    pub gravity_magnitude: f32,
    pub layer_mask: LayerMask,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            ray_kind: RayKind::Curved,
            smoothness: 1,
            max_distance: 100.0,
            gravity_direction: Vector3D::DOWN,
            gravity_magnitude: 2.0,
            layer_mask: LayerMask::ALL,
        }
    }
}

impl CastConfig {
    pub fn linear() -> Self {
        Self {
            ray_kind: RayKind::Linear,
            ..Self::default()
        }
    }

    pub fn with_smoothness(mut self, smoothness: i32) -> Self {
        self.smoothness = smoothness;
        self
    }

    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn with_layer_mask(mut self, layer_mask: LayerMask) -> Self {
        self.layer_mask = layer_mask;
        self
    }

    /// Max distance after fallback substitution
    pub fn effective_max_distance(&self) -> f32 {
        if self.max_distance.is_nan() || self.max_distance <= 0.0 || self.max_distance.is_infinite() {
            FALLBACK_MAX_DISTANCE
        } else {
            self.max_distance
        }
    }

    /// Smoothness after fallback substitution
    pub fn effective_smoothness(&self) -> i32 {
        if self.smoothness <= 0 {
            FALLBACK_SMOOTHNESS
        } else {
            self.smoothness
        }
    }
}

/// Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CastResult {
    /// Set only when the confirmatory check on the last segment hits
    pub hit: Option<RayHit>,
    pub path: RayPath,
}

impl CastResult {
    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }
}

/// Replacement sweep used for [`RayKind::Custom`]
pub trait CastStrategy {
    fn cast(
        &self,
        origin: Vector3D,
        direction: Vector3D,
        config: &CastConfig,
        fixed_time_step: f32,
        intersector: &dyn RayIntersector,
    ) -> CastResult;
}

/// Dispatch on `config.ray_kind`
pub fn cast(
    origin: Vector3D,
    direction: Vector3D,
    config: &CastConfig,
    fixed_time_step: f32,
    intersector: &dyn RayIntersector,
    custom: Option<&dyn CastStrategy>,
) -> CastResult {
    match (config.ray_kind, custom) {
        (RayKind::Custom, Some(strategy)) => {
            strategy.cast(origin, direction, config, fixed_time_step, intersector)
        }
        (RayKind::Curved, _) => curved_cast(origin, direction, config, fixed_time_step, intersector),
        _ => linear_cast(origin, direction, config, intersector),
    }
}

/// Straight sweep with constant per-step velocity
pub fn linear_cast(
    origin: Vector3D,
    direction: Vector3D,
    config: &CastConfig,
    intersector: &dyn RayIntersector,
) -> CastResult {
    sweep(origin, direction, Vector3D::ZERO, config, intersector)
}

/// Sweep whose velocity is bent by gravity each step
pub fn curved_cast(
    origin: Vector3D,
    direction: Vector3D,
    config: &CastConfig,
    fixed_time_step: f32,
    intersector: &dyn RayIntersector,
) -> CastResult {
    let smooth = config.effective_smoothness() as f32;
    let gravity = config.gravity_direction.normalize() * config.gravity_magnitude * fixed_time_step
        / (smooth * smooth);
    sweep(origin, direction, gravity, config, intersector)
}

fn sweep(
    origin: Vector3D,
    direction: Vector3D,
    gravity_step: Vector3D,
    config: &CastConfig,
    intersector: &dyn RayIntersector,
) -> CastResult {
    let max_distance = config.effective_max_distance();
    let smooth = config.effective_smoothness() as f32;

    let mut path = Vec::new();
    let mut cursor = origin;
    let mut velocity = direction.normalize() / smooth;
    let mut current;
    let mut length = 0.0;
    let mut step_hit;

    loop {
        path.push(cursor);
        current = cursor;
        cursor = current + velocity + gravity_step;
        velocity = cursor - current;
        let step_length = velocity.magnitude();
        length += step_length;

        step_hit = intersector.intersect(current, velocity, step_length, config.layer_mask);
        // Written negated so a NaN length or step ends the sweep
        if step_hit.is_some() || !(length < max_distance) {
            break;
        }
        // No progress (zero direction and no gravity): nothing more to find
        if !(step_length >= f32::EPSILON) {
            tracing::debug!("cast stalled at {:?} after {} points", current, path.len());
            return CastResult {
                hit: None,
                path: path.into(),
            };
        }
    }

    // The last segment is re-tested and that answer is authoritative
    let confirmed = intersector.intersect(current, velocity, velocity.magnitude(), config.layer_mask);
    let hit = confirmed.map(|c| step_hit.unwrap_or(c));

    CastResult {
        hit,
        path: path.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::ray::{Plane, Shape, StaticScene};
    use std::cell::Cell;

    fn wall_at_z(z: f32) -> StaticScene {
        StaticScene::new().with(Shape::Plane(Plane::new(
            Vector3D::new(0.0, 0.0, z),
            Vector3D::UP.cross(&Vector3D::RIGHT),
        )))
    }

    fn floor_at(y: f32) -> StaticScene {
        StaticScene::new().with(Shape::Plane(Plane::floor(y)))
    }

    #[test]
    fn test_linear_cast_hits_plane() {
        // Plane at z = 5 reporting an up normal, as in a flat target marker
        let scene = |origin: Vector3D, dir: Vector3D, max: f32, _: LayerMask| -> Option<RayHit> {
            let dir = dir.normalize();
            if dir.z <= 0.0 {
                return None;
            }
            let t = (5.0 - origin.z) / dir.z;
            (t >= 0.0 && t <= max).then(|| RayHit {
                point: origin + dir * t,
                normal: Vector3D::UP,
                distance: t,
            })
        };
        let config = CastConfig::linear().with_smoothness(1).with_max_distance(500.0);
        let result = linear_cast(Vector3D::ZERO, Vector3D::FORWARD, &config, &scene);

        let hit = result.hit.expect("plane is within range");
        assert!((hit.point - Vector3D::new(0.0, 0.0, 5.0)).magnitude() < 0.0001);
        assert_eq!(hit.normal, Vector3D::UP);
        assert_eq!(result.path.len(), 5);
        assert_eq!(result.path.points()[0], Vector3D::ZERO);
    }

    #[test]
    fn test_linear_cast_miss_stops_at_max_distance() {
        let scene = wall_at_z(50.0);
        let config = CastConfig::linear().with_max_distance(10.0).with_smoothness(2);
        let result = linear_cast(Vector3D::ZERO, Vector3D::FORWARD, &config, &scene);
        assert!(!result.is_hit());
        // 0.5 per step until 10 units are covered
        assert_eq!(result.path.len(), 20);
    }

    #[test]
    fn test_infinite_distance_matches_fallback() {
        let scene = wall_at_z(700.0);
        let inf = CastConfig::linear().with_max_distance(f32::INFINITY);
        let fixed = CastConfig::linear().with_max_distance(FALLBACK_MAX_DISTANCE);
        let a = linear_cast(Vector3D::ZERO, Vector3D::FORWARD, &inf, &scene);
        let b = linear_cast(Vector3D::ZERO, Vector3D::FORWARD, &fixed, &scene);
        assert_eq!(a, b);
        assert_eq!(a.path.len(), 500);

        let negative = CastConfig::linear().with_max_distance(-3.0);
        assert_eq!(negative.effective_max_distance(), FALLBACK_MAX_DISTANCE);
        assert_eq!(CastConfig::linear().with_max_distance(f32::NAN).effective_max_distance(), FALLBACK_MAX_DISTANCE);
    }

    #[test]
    fn test_zero_smoothness_matches_one() {
        let scene = wall_at_z(12.5);
        let zero = CastConfig::linear().with_smoothness(0);
        let one = CastConfig::linear().with_smoothness(1);
        let a = linear_cast(Vector3D::ZERO, Vector3D::FORWARD, &zero, &scene);
        let b = linear_cast(Vector3D::ZERO, Vector3D::FORWARD, &one, &scene);
        assert_eq!(a, b);
        assert!(a.is_hit());
        assert_eq!(CastConfig::linear().with_smoothness(-4).effective_smoothness(), 1);
    }

    #[test]
    fn test_curved_fallbacks_match_linear_rules() {
        let scene = floor_at(-1.0);
        let curved = CastConfig::default();

        let zero = curved.with_smoothness(0);
        let one = curved.with_smoothness(1);
        let a = curved_cast(Vector3D::ZERO, Vector3D::FORWARD, &zero, 0.02, &scene);
        let b = curved_cast(Vector3D::ZERO, Vector3D::FORWARD, &one, 0.02, &scene);
        assert_eq!(a, b);
        assert!(a.is_hit());

        let inf = curved.with_max_distance(f32::INFINITY);
        let fixed = curved.with_max_distance(FALLBACK_MAX_DISTANCE);
        let a = curved_cast(Vector3D::ZERO, Vector3D::FORWARD, &inf, 0.02, &scene);
        let b = curved_cast(Vector3D::ZERO, Vector3D::FORWARD, &fixed, 0.02, &scene);
        assert_eq!(a, b);
    }

    fn counting_miss<'a>(calls: &'a Cell<usize>) -> impl Fn(Vector3D, Vector3D, f32, LayerMask) -> Option<RayHit> + 'a {
        move |_: Vector3D, _: Vector3D, _: f32, _: LayerMask| {
            calls.set(calls.get() + 1);
            assert!(calls.get() < 10_000, "cast did not terminate");
            None
        }
    }

    #[test]
    fn test_nan_origin_ends_after_one_step() {
        let calls = Cell::new(0);
        let scene = counting_miss(&calls);
        let origin = Vector3D::new(f32::NAN, 0.0, 0.0);
        let result = linear_cast(origin, Vector3D::FORWARD, &CastConfig::linear(), &scene);
        assert!(!result.is_hit());
        assert_eq!(result.path.len(), 1);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_nan_time_step_ends_after_one_step() {
        let calls = Cell::new(0);
        let scene = counting_miss(&calls);
        let result = curved_cast(Vector3D::ZERO, Vector3D::FORWARD, &CastConfig::default(), f32::NAN, &scene);
        assert!(!result.is_hit());
        assert_eq!(result.path.len(), 1);

        let nan_gravity = CastConfig {
            gravity_magnitude: f32::NAN,
            ..CastConfig::default()
        };
        let result = curved_cast(Vector3D::ZERO, Vector3D::FORWARD, &nan_gravity, 0.02, &scene);
        assert_eq!(result.path.len(), 1);
    }

    #[test]
    fn test_curved_cast_falls_onto_floor() {
        let scene = floor_at(-1.0);
        let config = CastConfig::default().with_smoothness(4);
        let result = curved_cast(Vector3D::ZERO, Vector3D::FORWARD, &config, 0.02, &scene);

        let hit = result.hit.expect("gravity pulls the arc to the floor");
        assert!((hit.point.y + 1.0).abs() < 0.0001);
        assert!(hit.point.z > 0.0);
        assert_eq!(hit.normal, Vector3D::UP);
        // Heights never increase along the arc
        for pair in result.path.points().windows(2) {
            assert!(pair[1].y <= pair[0].y);
        }
    }

    #[test]
    fn test_zero_direction_without_gravity_terminates() {
        let scene = floor_at(-1.0);
        let result = linear_cast(Vector3D::ZERO, Vector3D::ZERO, &CastConfig::linear(), &scene);
        assert!(!result.is_hit());
        assert_eq!(result.path.len(), 1);
    }

    #[test]
    fn test_confirmation_check_runs_on_last_segment() {
        let calls = Cell::new(0);
        let scene = floor_at(-0.5);
        let counting = |o: Vector3D, d: Vector3D, m: f32, l: LayerMask| {
            calls.set(calls.get() + 1);
            scene.intersect(o, d, m, l)
        };
        let config = CastConfig::linear();
        let result = linear_cast(Vector3D::ZERO, Vector3D::DOWN, &config, &counting);
        assert!(result.is_hit());
        // One incremental check for the single step, plus the confirmation
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_custom_without_strategy_is_linear() {
        let scene = wall_at_z(3.0);
        let custom = CastConfig {
            ray_kind: RayKind::Custom,
            ..CastConfig::linear()
        };
        let a = cast(Vector3D::ZERO, Vector3D::FORWARD, &custom, 0.02, &scene, None);
        let b = cast(Vector3D::ZERO, Vector3D::FORWARD, &CastConfig::linear(), 0.02, &scene, None);
        assert_eq!(a, b);
    }

    struct NeverHits;

    impl CastStrategy for NeverHits {
        fn cast(
            &self,
            origin: Vector3D,
            _direction: Vector3D,
            _config: &CastConfig,
            _fixed_time_step: f32,
            _intersector: &dyn RayIntersector,
        ) -> CastResult {
            CastResult {
                hit: None,
                path: vec![origin].into(),
            }
        }
    }

    #[test]
    fn test_custom_strategy_is_used() {
        let scene = wall_at_z(3.0);
        let custom = CastConfig {
            ray_kind: RayKind::Custom,
            ..CastConfig::linear()
        };
        let result = cast(Vector3D::ZERO, Vector3D::FORWARD, &custom, 0.02, &scene, Some(&NeverHits));
        assert!(!result.is_hit());
        assert_eq!(result.path.len(), 1);
    }
}
