//! Scripted hand closing on a pointer
//!
//! Drives a [`HandTrackingSession`] from a scripted provider in which the
//! right hand curls from open to fist, and a grab-selecting pointer attached
//! to that hand aims down at a floor with a crate on it. One record is
//! produced per tick.

use anyhow::{Context, Result};
use handcast::pointer::{Aabb, GrabSelection, Plane, Shape, StaticScene, TransformAim};
use handcast::tracking::{
    Finger, ProviderRegistry, ScriptedProvider, SkeletonFrame, SkeletonSample, TrackingOutcome,
    TRACKED_BONE_COUNT,
};
use handcast::{
    HandcastConfig, Hand, HandTrackingSession, Handedness, Pointer, PointerCaster, PointerFrame, Pose,
    Quaternion, RayKind, SelectionTransition, TargetedPose, Vector3D,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

const PROVIDER_ID: &str = "scripted-hand";
const FIXED_DELTA_TIME: f32 = 0.02;

/// Demo run options
#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub config: Option<PathBuf>,
    pub ticks: usize,
    pub ray_kind: Option<RayKind>,
    /// Per-joint bend reached on the last tick, in degrees
    pub max_curl_degrees: f32,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            config: None,
            ticks: 30,
            ray_kind: None,
            max_curl_degrees: 60.0,
        }
    }
}

/// What happened on one tick
#[derive(Debug, Clone, Serialize)]
pub struct TickRecord {
    pub tick: usize,
    pub tracking: &'static str,
    pub grab_strength: f32,
    pub pinch_strength: f32,
    pub gesture: &'static str,
    pub target: TargetedPose,
    pub selection: &'static str,
    pub selection_started: bool,
    pub path_points: usize,
}

fn tracking_name(outcome: TrackingOutcome) -> &'static str {
    match outcome {
        TrackingOutcome::NoProvider => "no_provider",
        TrackingOutcome::Skeleton => "skeleton",
        TrackingOutcome::Gesture => "gesture",
        TrackingOutcome::Failed => "failed",
    }
}

fn selection_name(transition: SelectionTransition) -> &'static str {
    match transition {
        SelectionTransition::Started => "started",
        SelectionTransition::Held => "held",
        SelectionTransition::Released => "released",
        SelectionTransition::Idle => "idle",
    }
}

/// Floor at y = 0 with a half-metre crate on layer 1
pub fn demo_scene() -> StaticScene {
    StaticScene::new()
        .with(Shape::Plane(Plane::floor(0.0)))
        .with_layer(
            Shape::Box(Aabb::from_center(
                Vector3D::new(1.5, 0.25, 0.3),
                Vector3D::new(0.5, 0.5, 0.5),
            )),
            1,
        )
}

/// Every finger joint bent by `degrees` around the palm's Z axis
fn curled_rotations(degrees: f32) -> Vec<Quaternion> {
    let mut rotations = vec![Quaternion::IDENTITY; TRACKED_BONE_COUNT];
    for finger in Finger::ALL {
        let first = finger.first_bone();
        for step in 1..4 {
            rotations[first + step] =
                Quaternion::from_axis_angle(Vector3D::FORWARD, (degrees * step as f32).to_radians());
        }
    }
    rotations
}

fn hand_root() -> Pose {
    Pose::from_position(Vector3D::new(0.25, 1.2, 0.3))
}

fn scripted_provider(ticks: usize, max_curl_degrees: f32) -> ScriptedProvider {
    let last = ticks.saturating_sub(1).max(1) as f32;
    let frames = (0..ticks).map(|tick| SkeletonFrame {
        left: None,
        right: Some(SkeletonSample::new(
            hand_root(),
            curled_rotations(max_curl_degrees * tick as f32 / last),
            1.0,
        )),
    });
    ScriptedProvider::new(PROVIDER_ID).with_skeletons(frames)
}

/// Run the scripted session and return one record per tick
pub fn run_demo(options: &DemoOptions) -> Result<Vec<TickRecord>> {
    let mut config = match &options.config {
        Some(path) => HandcastConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => HandcastConfig::default(),
    };
    if let Some(ray_kind) = options.ray_kind {
        config.pointer.ray_kind = ray_kind;
    }

    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(scripted_provider(options.ticks, options.max_curl_degrees)))?;
    let failed = registry.init_all();
    if !failed.is_empty() {
        anyhow::bail!("Tracking providers failed to start: {}", failed.join(", "));
    }

    let mut session = HandTrackingSession::new(registry, config.tracking.clone()).with_hands(
        Hand::new(Handedness::Left).with_calibration(config.calibration),
        Hand::new(Handedness::Right).with_calibration(config.calibration),
    );

    let caster = PointerCaster::new(config.pointer.cast_config(), config.pointer.interpolation_config());
    let mut pointer = Pointer::new(Box::new(TransformAim), caster)
        .with_selection(
            Box::new(GrabSelection::new(Handedness::Right).with_threshold(config.pointer.grab_threshold)),
            config.pointer.hysteresis(),
        )
        .with_starting_offset(config.pointer.starting_offset);

    let scene = demo_scene();
    let camera = Pose::from_position(Vector3D::new(0.0, 1.6, 0.0));
    // Pointer rides on the hand, tilted 30 degrees toward the floor
    let transform = Pose::new(
        hand_root().position,
        Quaternion::from_axis_angle(Vector3D::FORWARD, (-30.0f32).to_radians()),
    );

    info!(
        ticks = options.ticks,
        ray_kind = ?config.pointer.ray_kind,
        "Starting handcast demo"
    );

    let mut records = Vec::with_capacity(options.ticks);
    for tick in 0..options.ticks {
        let outcome = session.tick(&camera);
        let frame = PointerFrame::from_session(&session, transform, camera, FIXED_DELTA_TIME);
        let update = pointer.tick(&frame, &scene);
        let right = session.right().state();

        if let Some(target) = update.selection_started {
            info!(
                tick,
                x = target.position.x,
                y = target.position.y,
                z = target.position.z,
                "Selection started"
            );
        }
        debug!(
            tick,
            grab = right.grab_strength,
            valid = update.pose.is_valid,
            "tick"
        );

        records.push(TickRecord {
            tick,
            tracking: tracking_name(outcome),
            grab_strength: right.grab_strength,
            pinch_strength: right.pinch_strength,
            gesture: right.gesture.as_str(),
            target: update.pose,
            selection: selection_name(update.selection),
            selection_started: update.selection_started.is_some(),
            path_points: pointer.path().len(),
        });
    }

    session.shutdown();
    Ok(records)
}
