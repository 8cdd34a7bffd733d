//! Ray intersection primitive consumed by the caster
//!
//! The caster never inspects the environment itself: it asks a
//! [`RayIntersector`] whether a straight segment hits anything. Engines plug
//! their physics query in here. [`StaticScene`] is a small reference
//! implementation made of planes and boxes.

use crate::spatial::Vector3D;
use serde::{Deserialize, Serialize};

/// Bit mask selecting which layers a ray may hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    /// Mask containing a single layer (0..32)
    pub fn layer(index: u8) -> Self {
        Self(1u32.checked_shl(index as u32).unwrap_or(0))
    }

    pub fn contains(&self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// A successful intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vector3D,
    pub normal: Vector3D,
    pub distance: f32,
}

/// "Ray intersects scene, return closest hit"
///
/// Implementations must be free of side effects: the caster calls this many
/// times along a single path.
pub trait RayIntersector {
    fn intersect(
        &self,
        origin: Vector3D,
        direction: Vector3D,
        max_distance: f32,
        layer_mask: LayerMask,
    ) -> Option<RayHit>;
}

impl<F> RayIntersector for F
where
    F: Fn(Vector3D, Vector3D, f32, LayerMask) -> Option<RayHit>,
{
    fn intersect(
        &self,
        origin: Vector3D,
        direction: Vector3D,
        max_distance: f32,
        layer_mask: LayerMask,
    ) -> Option<RayHit> {
        self(origin, direction, max_distance, layer_mask)
    }
}

/// Infinite plane `dot(normal, p) = offset`, hit from either side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vector3D,
    pub offset: f32,
}

impl Plane {
    /// Plane through `point` facing `normal`
    pub fn new(point: Vector3D, normal: Vector3D) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            offset: normal.dot(&point),
        }
    }

    /// Horizontal floor at height `y`
    pub fn floor(y: f32) -> Self {
        Self::new(Vector3D::new(0.0, y, 0.0), Vector3D::UP)
    }

    /// Distance along a unit direction, if the ray crosses the plane ahead
    pub fn ray_distance(&self, origin: Vector3D, direction: Vector3D) -> Option<f32> {
        let denom = self.normal.dot(&direction);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.offset - self.normal.dot(&origin)) / denom;
        (t >= 0.0).then_some(t)
    }

    fn surface_normal(&self, direction: Vector3D) -> Vector3D {
        if self.normal.dot(&direction) > 0.0 {
            -self.normal
        } else {
            self.normal
        }
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3D,
    pub max: Vector3D,
}

impl Aabb {
    pub fn new(min: Vector3D, max: Vector3D) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vector3D, size: Vector3D) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    // Slab-method ray–AABB intersection, returns Some(t) or None
    pub fn ray_distance(&self, origin: Vector3D, direction: Vector3D) -> Option<f32> {
        let inv = |d: f32| if d != 0.0 { 1.0 / d } else { f32::INFINITY };
        let slab = |o: f32, d: f32, lo: f32, hi: f32| {
            let (a, b) = ((lo - o) * inv(d), (hi - o) * inv(d));
            if a > b { (b, a) } else { (a, b) }
        };

        let (mut tmin, mut tmax) = slab(origin.x, direction.x, self.min.x, self.max.x);
        let (tymin, tymax) = slab(origin.y, direction.y, self.min.y, self.max.y);
        if tmin > tymax || tymin > tmax {
            return None;
        }
        tmin = tmin.max(tymin);
        tmax = tmax.min(tymax);

        let (tzmin, tzmax) = slab(origin.z, direction.z, self.min.z, self.max.z);
        if tmin > tzmax || tzmin > tmax {
            return None;
        }
        tmin = tmin.max(tzmin);
        tmax = tmax.min(tzmax);

        if tmax < 0.0 {
            return None;
        }
        Some(if tmin >= 0.0 { tmin } else { tmax })
    }

    /// Outward normal of the face closest to `point`
    fn face_normal(&self, point: Vector3D) -> Vector3D {
        let candidates = [
            (point.x - self.min.x, -Vector3D::RIGHT),
            (self.max.x - point.x, Vector3D::RIGHT),
            (point.y - self.min.y, Vector3D::DOWN),
            (self.max.y - point.y, Vector3D::UP),
            (point.z - self.min.z, -Vector3D::FORWARD),
            (self.max.z - point.z, Vector3D::FORWARD),
        ];
        candidates
            .iter()
            .min_by(|a, b| a.0.abs().total_cmp(&b.0.abs()))
            .map(|(_, n)| *n)
            .unwrap_or(Vector3D::UP)
    }
}

/// A shape placed on a layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Plane(Plane),
    Box(Aabb),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SceneEntry {
    shape: Shape,
    layer: u8,
}

/// Immutable collection of shapes answering closest-hit queries
#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    entries: Vec<SceneEntry>,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on layer 0
    pub fn with(self, shape: Shape) -> Self {
        self.with_layer(shape, 0)
    }

    pub fn with_layer(mut self, shape: Shape, layer: u8) -> Self {
        self.entries.push(SceneEntry { shape, layer });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RayIntersector for StaticScene {
    fn intersect(
        &self,
        origin: Vector3D,
        direction: Vector3D,
        max_distance: f32,
        layer_mask: LayerMask,
    ) -> Option<RayHit> {
        let dir = direction.normalize();
        if dir == Vector3D::ZERO {
            return None;
        }

        self.entries
            .iter()
            .filter(|entry| layer_mask.contains(entry.layer))
            .filter_map(|entry| {
                let (distance, normal) = match entry.shape {
                    Shape::Plane(plane) => {
                        let t = plane.ray_distance(origin, dir)?;
                        (t, plane.surface_normal(dir))
                    }
                    Shape::Box(aabb) => {
                        let t = aabb.ray_distance(origin, dir)?;
                        (t, aabb.face_normal(origin + dir * t))
                    }
                };
                (distance <= max_distance).then(|| RayHit {
                    point: origin + dir * distance,
                    normal,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
