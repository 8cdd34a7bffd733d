//! Per-hand state: skeleton, strengths and gesture

use super::bones::{Finger, Handedness};
use super::gesture::{GestureClassifier, GestureType};
use super::skeleton::{HandSkeleton, RestPose};
use crate::error::Result;
use crate::spatial::{clamp01, normalize_range, Pose, Quaternion, Vector3D};
use serde::{Deserialize, Serialize};

/// Calibration range used to normalize a raw measurement into `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct FingerNorm {
    pub min: f32,
    pub max: f32,
}

impl FingerNorm {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn normalize(&self, value: f32) -> f32 {
        normalize_range(self.min, self.max, value)
    }
}

impl From<[f32; 2]> for FingerNorm {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<FingerNorm> for [f32; 2] {
    fn from(n: FingerNorm) -> Self {
        [n.min, n.max]
    }
}

/// Curl ranges in degrees per finger, plus the pinch distance range in metres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerCalibration {
    pub thumb: FingerNorm,
    pub index: FingerNorm,
    pub middle: FingerNorm,
    pub ring: FingerNorm,
    pub pinky: FingerNorm,
    pub pinch: FingerNorm,
}

impl Default for FingerCalibration {
    fn default() -> Self {
        Self {
            thumb: FingerNorm::new(115.0, 145.0),
            index: FingerNorm::new(41.0, 170.0),
            middle: FingerNorm::new(35.0, 140.0),
            ring: FingerNorm::new(35.0, 170.0),
            pinky: FingerNorm::new(66.0, 130.0),
            pinch: FingerNorm::new(0.04, 0.16),
        }
    }
}

impl FingerCalibration {
    pub fn finger(&self, finger: Finger) -> FingerNorm {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }
}

/// Strengths and gesture delivered directly by gesture-only providers
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandGesture {
    pub gesture: GestureType,
    pub root: Pose,
    pub grab_strength: f32,
    pub pinch_strength: f32,
}

/// Interaction scalars consumers read each tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HandState {
    pub grab_strength: f32,
    pub pinch_strength: f32,
    pub gesture: GestureType,
}

/// One physical hand for the lifetime of a tracking session
#[derive(Debug, Clone)]
pub struct Hand {
    handedness: Handedness,
    rest: RestPose,
    calibration: FingerCalibration,
    classifier: GestureClassifier,
    skeleton: HandSkeleton,
    grab_strength: f32,
    pinch_strength: f32,
    gesture: GestureType,
    /// Tracking confidence reported with the last skeleton
    pub skeleton_confidence: f32,
    /// Whether the last update carried gesture data instead of a skeleton
    pub uses_gestures: bool,
    pub is_active: bool,
}

impl Hand {
    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            rest: RestPose::reference(),
            calibration: FingerCalibration::default(),
            classifier: GestureClassifier::default(),
            skeleton: HandSkeleton::default(),
            grab_strength: 0.0,
            pinch_strength: 0.0,
            gesture: GestureType::Five,
            skeleton_confidence: 0.0,
            uses_gestures: true,
            is_active: false,
        }
    }

    /// Capture the rest pose of the hand model. Done once, before tracking.
    pub fn with_rest_pose(mut self, rest: RestPose) -> Self {
        self.rest = rest;
        self
    }

    pub fn with_calibration(mut self, calibration: FingerCalibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn with_classifier(mut self, classifier: GestureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn is_left(&self) -> bool {
        self.handedness == Handedness::Left
    }

    pub fn skeleton(&self) -> &HandSkeleton {
        &self.skeleton
    }

    pub fn rest_pose(&self) -> &RestPose {
        &self.rest
    }

    pub fn root(&self) -> Pose {
        self.skeleton.root
    }

    pub fn grab_strength(&self) -> f32 {
        self.grab_strength
    }

    pub fn pinch_strength(&self) -> f32 {
        self.pinch_strength
    }

    pub fn gesture(&self) -> GestureType {
        self.gesture
    }

    pub fn state(&self) -> HandState {
        HandState {
            grab_strength: self.grab_strength,
            pinch_strength: self.pinch_strength,
            gesture: self.gesture,
        }
    }

    /// Replace the skeleton wholesale and recompute strengths and gesture
    pub fn apply_skeleton(&mut self, rotations: &[Quaternion], root: Pose) -> Result<()> {
        self.skeleton = HandSkeleton::sanitized(rotations, root, &self.rest)?;
        self.uses_gestures = false;
        self.grab_strength = self.compute_grab_strength();
        self.pinch_strength = self.compute_pinch_strength();
        self.gesture = self.compute_gesture();
        Ok(())
    }

    /// Take provider-computed values as they are (strengths clamped)
    pub fn apply_gesture(&mut self, data: &HandGesture) {
        self.uses_gestures = true;
        self.gesture = data.gesture;
        self.skeleton.root = data.root;
        self.grab_strength = clamp01(data.grab_strength);
        self.pinch_strength = clamp01(data.pinch_strength);
    }

    /// Fingertip in hand space (forward kinematics over the rest offsets)
    pub fn finger_tip_position(&self, finger: Finger) -> Vector3D {
        self.skeleton.finger_tip_position(finger, &self.rest)
    }

    /// Fingertip in world space, through the root pose
    pub fn finger_tip_world(&self, finger: Finger) -> Vector3D {
        self.skeleton.root.transform_point(self.finger_tip_position(finger))
    }

    /// Summed joint angle of a finger, optionally rescaled by its calibration
    pub fn finger_angle(&self, finger: Finger, normalize: bool) -> f32 {
        let angle = self.skeleton.finger_curl_degrees(finger);
        if normalize {
            self.calibration.finger(finger).normalize(angle)
        } else {
            angle
        }
    }

    fn normalized_angles(&self) -> [f32; 5] {
        Finger::ALL.map(|finger| self.finger_angle(finger, true))
    }

    fn compute_grab_strength(&self) -> f32 {
        let sum: f32 = self.normalized_angles().iter().sum();
        clamp01(normalize_range(0.0, 5.0, sum))
    }

    fn compute_pinch_strength(&self) -> f32 {
        let distance = self
            .finger_tip_position(Finger::Index)
            .distance(&self.finger_tip_position(Finger::Thumb));
        clamp01(1.0 - self.calibration.pinch.normalize(distance))
    }

    fn compute_gesture(&self) -> GestureType {
        let [thumb, index, middle, ring, pinky] = self.normalized_angles();
        self.classifier.classify(thumb, index, middle, ring, pinky)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::bones::{HandBone, BONE_COUNT, TRACKED_BONE_COUNT};

    fn straight() -> Vec<Quaternion> {
        vec![Quaternion::IDENTITY; TRACKED_BONE_COUNT]
    }

    /// Bend every joint of every finger by `degrees` around Z
    fn curled(degrees: f32) -> Vec<Quaternion> {
        let mut rotations = straight();
        for finger in Finger::ALL {
            let first = finger.first_bone();
            for step in 1..4 {
                rotations[first + step] =
                    Quaternion::from_axis_angle(Vector3D::FORWARD, (degrees * step as f32).to_radians());
            }
        }
        rotations
    }

    /// Rest pose putting the index tip `distance` away from the thumb tip
    fn pinch_rest(distance: f32) -> RestPose {
        let mut offsets = [Vector3D::ZERO; BONE_COUNT];
        offsets[HandBone::IndexMetacarpal.index()] = Vector3D::new(distance, 0.0, 0.0);
        RestPose::new(offsets, [Quaternion::IDENTITY; BONE_COUNT])
    }

    #[test]
    fn test_straight_finger_normalizes_to_zero() {
        let mut hand = Hand::new(Handedness::Right).with_calibration(FingerCalibration {
            index: FingerNorm::new(0.0, 170.0),
            ..FingerCalibration::default()
        });
        hand.apply_skeleton(&straight(), Pose::IDENTITY).unwrap();
        assert_eq!(hand.finger_angle(Finger::Index, false), 0.0);
        assert!(hand.finger_angle(Finger::Index, true).abs() < 0.0001);
    }

    #[test]
    fn test_finger_angle_sums_joint_pairs() {
        let mut hand = Hand::new(Handedness::Left);
        hand.apply_skeleton(&curled(30.0), Pose::IDENTITY).unwrap();
        // metacarpal->proximal 30, proximal->middle 30, middle->distal 30
        let raw = hand.finger_angle(Finger::Middle, false);
        assert!((raw - 90.0).abs() < 0.01);
        let norm = hand.finger_angle(Finger::Middle, true);
        assert!((norm - (90.0 - 35.0) / 105.0).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_calibration_returns_zero() {
        let mut hand = Hand::new(Handedness::Left).with_calibration(FingerCalibration {
            ring: FingerNorm::new(50.0, 50.0),
            ..FingerCalibration::default()
        });
        hand.apply_skeleton(&curled(20.0), Pose::IDENTITY).unwrap();
        assert_eq!(hand.finger_angle(Finger::Ring, true), 0.0);
    }

    #[test]
    fn test_grab_strength_bounds() {
        for degrees in [0.0, 10.0, 40.0, 60.0, 90.0, 120.0] {
            let mut hand = Hand::new(Handedness::Right);
            hand.apply_skeleton(&curled(degrees), Pose::IDENTITY).unwrap();
            let grab = hand.grab_strength();
            assert!((0.0..=1.0).contains(&grab), "grab {grab} at {degrees} degrees");
        }
    }

    #[test]
    fn test_curled_hand_grabs_harder_than_open_hand() {
        let mut open = Hand::new(Handedness::Right);
        open.apply_skeleton(&curled(15.0), Pose::IDENTITY).unwrap();
        let mut closed = Hand::new(Handedness::Right);
        closed.apply_skeleton(&curled(50.0), Pose::IDENTITY).unwrap();
        assert!(closed.grab_strength() > open.grab_strength());
        assert_eq!(closed.gesture(), GestureType::Fist);
    }

    #[test]
    fn test_pinch_strength_at_calibration_bounds() {
        let calibration = FingerCalibration::default();

        let mut far = Hand::new(Handedness::Right).with_rest_pose(pinch_rest(calibration.pinch.max));
        far.apply_skeleton(&straight(), Pose::IDENTITY).unwrap();
        assert!(far.pinch_strength().abs() < 0.0001);

        let mut near = Hand::new(Handedness::Right).with_rest_pose(pinch_rest(calibration.pinch.min));
        near.apply_skeleton(&straight(), Pose::IDENTITY).unwrap();
        assert!((near.pinch_strength() - 1.0).abs() < 0.0001);

        let mut touching = Hand::new(Handedness::Right).with_rest_pose(pinch_rest(0.0));
        touching.apply_skeleton(&straight(), Pose::IDENTITY).unwrap();
        assert_eq!(touching.pinch_strength(), 1.0);
    }

    #[test]
    fn test_reference_open_hand_does_not_pinch() {
        let mut hand = Hand::new(Handedness::Right);
        hand.apply_skeleton(&straight(), Pose::IDENTITY).unwrap();
        assert_eq!(hand.pinch_strength(), 0.0);
        assert_eq!(hand.gesture(), GestureType::Five);
        assert_eq!(hand.state().pinch_strength, 0.0);
    }

    #[test]
    fn test_nan_bones_never_produce_nan_outputs() {
        for bone in 0..TRACKED_BONE_COUNT {
            let mut rotations = curled(35.0);
            rotations[bone] = Quaternion::new(f32::NAN, f32::NAN, 0.0, 1.0);
            let mut hand = Hand::new(Handedness::Left);
            hand.apply_skeleton(&rotations, Pose::IDENTITY).unwrap();

            for finger in Finger::ALL {
                assert!(!hand.finger_angle(finger, true).is_nan());
                assert!(!hand.finger_angle(finger, false).is_nan());
            }
            assert!(!hand.grab_strength().is_nan());
            assert!(!hand.pinch_strength().is_nan());
        }
    }

    #[test]
    fn test_apply_gesture_clamps_strengths() {
        let mut hand = Hand::new(Handedness::Left);
        hand.apply_gesture(&HandGesture {
            gesture: GestureType::Gun,
            root: Pose::from_position(Vector3D::UP),
            grab_strength: 1.7,
            pinch_strength: -0.2,
        });
        assert!(hand.uses_gestures);
        assert_eq!(hand.gesture(), GestureType::Gun);
        assert_eq!(hand.grab_strength(), 1.0);
        assert_eq!(hand.pinch_strength(), 0.0);
        assert_eq!(hand.root().position, Vector3D::UP);
    }

    #[test]
    fn test_world_fingertip_follows_root() {
        let mut hand = Hand::new(Handedness::Right);
        let root = Pose::from_position(Vector3D::new(0.0, 1.5, 0.0));
        hand.apply_skeleton(&straight(), root).unwrap();
        let local = hand.finger_tip_position(Finger::Index);
        let world = hand.finger_tip_world(Finger::Index);
        assert!((world.y - local.y - 1.5).abs() < 0.0001);
    }
}
