//! Pointer evaluation: cast, smooth, target, select

use super::aim::AimSource;
use super::cast::{cast, CastConfig, CastStrategy};
use super::frame::PointerFrame;
use super::interpolation::{InterpolationConfig, PathSmoother};
use super::ray::RayIntersector;
use super::selection::{SelectionHysteresis, SelectionStrategy, SelectionTransition};
use crate::spatial::{Pose, Quaternion, Vector3D};
use serde::Serialize;
use tracing::debug;

/// Best estimate of the point being aimed at.
///
/// `position` and `rotation` are stale when `is_valid` is false; use
/// [`pose`](Self::pose) to read them safely.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TargetedPose {
    pub is_valid: bool,
    pub position: Vector3D,
    pub rotation: Quaternion,
}

impl TargetedPose {
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> Option<Pose> {
        self.is_valid.then(|| Pose::new(self.position, self.rotation))
    }
}

/// Casting and smoothing state of one pointer
pub struct PointerCaster {
    pub config: CastConfig,
    pub interpolation: InterpolationConfig,
    smoother: PathSmoother,
    strategy: Option<Box<dyn CastStrategy>>,
    target: TargetedPose,
}

impl PointerCaster {
    pub fn new(config: CastConfig, interpolation: InterpolationConfig) -> Self {
        Self {
            config,
            interpolation,
            smoother: PathSmoother::new(),
            strategy: None,
            target: TargetedPose::invalid(),
        }
    }

    /// Install the sweep used for [`RayKind::Custom`](super::RayKind::Custom)
    pub fn with_strategy(mut self, strategy: Box<dyn CastStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Smoothed path of the last evaluation that hit, in point order
    pub fn path(&self) -> &[Vector3D] {
        self.smoother.previous()
    }

    /// Result of the last evaluation
    pub fn target(&self) -> TargetedPose {
        self.target
    }

    /// Drop path history so the next hit seeds afresh
    pub fn reset(&mut self) {
        self.smoother.reset();
        self.target = TargetedPose::invalid();
    }

    /// Cast, and on a hit smooth the path and place the target on it.
    ///
    /// The target takes its X/Z from the end of the smoothed path and its
    /// height from the hit itself, oriented so up matches the hit normal.
    /// A miss leaves the smoothed path untouched.
    pub fn evaluate(
        &mut self,
        origin: Vector3D,
        direction: Vector3D,
        fixed_time_step: f32,
        intersector: &dyn RayIntersector,
    ) -> TargetedPose {
        let result = cast(
            origin,
            direction,
            &self.config,
            fixed_time_step,
            intersector,
            self.strategy.as_deref(),
        );

        self.target = match result.hit {
            Some(hit) => {
                let smoothed = self.smoother.interpolate(&result.path, &self.interpolation);
                let end = smoothed.last().copied().unwrap_or(hit.point);
                TargetedPose {
                    is_valid: true,
                    position: Vector3D::new(end.x, hit.point.y, end.z),
                    rotation: Quaternion::from_to_rotation(Vector3D::UP, hit.normal),
                }
            }
            None => TargetedPose::invalid(),
        };
        self.target
    }
}

/// What one pointer tick produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerUpdate {
    pub pose: TargetedPose,
    pub selection: SelectionTransition,
    /// The targeted pose, on the tick selection started while on target
    pub selection_started: Option<TargetedPose>,
}

/// A complete pointer: aim, caster and optional selection policy
pub struct Pointer {
    aim: Box<dyn AimSource>,
    caster: PointerCaster,
    selection: Option<Box<dyn SelectionStrategy>>,
    hysteresis: SelectionHysteresis,
    /// Local offset from the aim origin, rotated by the transform
    pub starting_offset: Vector3D,
    pub enabled: bool,
}

impl Pointer {
    pub fn new(aim: Box<dyn AimSource>, caster: PointerCaster) -> Self {
        Self {
            aim,
            caster,
            selection: None,
            hysteresis: SelectionHysteresis::default(),
            starting_offset: Vector3D::ZERO,
            enabled: true,
        }
    }

    pub fn with_selection(mut self, selection: Box<dyn SelectionStrategy>, hysteresis: SelectionHysteresis) -> Self {
        self.selection = Some(selection);
        self.hysteresis = hysteresis;
        self
    }

    pub fn with_starting_offset(mut self, offset: Vector3D) -> Self {
        self.starting_offset = offset;
        self
    }

    pub fn caster(&self) -> &PointerCaster {
        &self.caster
    }

    pub fn caster_mut(&mut self) -> &mut PointerCaster {
        &mut self.caster
    }

    /// Smoothed path for rendering
    pub fn path(&self) -> &[Vector3D] {
        self.caster.path()
    }

    pub fn renders_line(&self) -> bool {
        self.aim.renders_line()
    }

    pub fn is_selecting(&self) -> bool {
        self.hysteresis.is_selecting()
    }

    /// Aim, evaluate, then advance selection.
    ///
    /// A disabled pointer reports an invalid pose and leaves the selection
    /// state as it was.
    pub fn tick(&mut self, frame: &PointerFrame<'_>, intersector: &dyn RayIntersector) -> PointerUpdate {
        if !self.enabled {
            let selection = if self.hysteresis.is_selecting() {
                SelectionTransition::Held
            } else {
                SelectionTransition::Idle
            };
            return PointerUpdate {
                pose: TargetedPose::invalid(),
                selection,
                selection_started: None,
            };
        }

        let origin = self.aim.origin(frame) + frame.transform.rotation * self.starting_offset;
        let direction = self.aim.direction(frame, origin);
        let pose = self
            .caster
            .evaluate(origin, direction, frame.fixed_delta_time, intersector);

        let selection = match &self.selection {
            Some(strategy) => {
                let value = strategy.selection_value(frame);
                let threshold = strategy.selection_threshold();
                let transition = self.hysteresis.update(value, threshold);
                if matches!(transition, SelectionTransition::Started | SelectionTransition::Released) {
                    debug!(value, threshold, ?transition, "pointer selection changed");
                }
                transition
            }
            None => SelectionTransition::Idle,
        };

        let selection_started = (selection == SelectionTransition::Started && pose.is_valid).then_some(pose);

        PointerUpdate {
            pose,
            selection,
            selection_started,
        }
    }
}
