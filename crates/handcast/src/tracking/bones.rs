//! Canonical hand bone and finger enumerations

use serde::{Deserialize, Serialize};

/// Number of bones whose rotations a tracking provider supplies
pub const TRACKED_BONE_COUNT: usize = 22;

/// Tracked bones plus the five fingertips
pub const BONE_COUNT: usize = 27;

/// Bones per finger, metacarpal through distal
pub const BONES_PER_FINGER: usize = 4;

/// Canonical bone order. Rotations arrive indexed by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandBone {
    Wrist = 0,
    Palm,
    ThumbMetacarpal,
    ThumbProximal,
    ThumbMiddle,
    ThumbDistal,
    IndexMetacarpal,
    IndexProximal,
    IndexMiddle,
    IndexDistal,
    MiddleMetacarpal,
    MiddleProximal,
    MiddleMiddle,
    MiddleDistal,
    RingMetacarpal,
    RingProximal,
    RingMiddle,
    RingDistal,
    PinkyMetacarpal,
    PinkyProximal,
    PinkyMiddle,
    PinkyDistal,
    ThumbTip,
    IndexTip,
    MiddleTip,
    RingTip,
    PinkyTip,
}

impl HandBone {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether providers supply a rotation for this bone
    pub fn is_tracked(self) -> bool {
        self.index() < TRACKED_BONE_COUNT
    }
}

/// Which hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// The five fingers, in bone-table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    Thumb = 0,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Index of the metacarpal; the next three indices are proximal, middle, distal
    pub fn first_bone(self) -> usize {
        HandBone::ThumbMetacarpal.index() + BONES_PER_FINGER * self.index()
    }

    pub fn tip(self) -> usize {
        HandBone::ThumbTip.index() + self.index()
    }
}
