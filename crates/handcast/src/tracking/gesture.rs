//! Discrete hand gestures and the nearest-signature classifier

use serde::{Deserialize, Serialize};

/// Recognized whole-hand gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureType {
    /// Open palm, all fingers straight
    #[default]
    Five,
    /// Closed fist
    Fist,
    /// Thumb and index curled into a ring, others straight
    Ok,
    /// Thumb up and index extended
    Gun,
    /// Thumbs up
    Like,
    /// Index extended only
    Pointing,
}

impl GestureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Five => "five",
            Self::Fist => "fist",
            Self::Ok => "ok",
            Self::Gun => "gun",
            Self::Like => "like",
            Self::Pointing => "pointing",
        }
    }
}

/// Expected normalized curl per finger (thumb, index, middle, ring, pinky)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSignature {
    pub gesture: GestureType,
    pub curls: [f32; 5],
}

impl GestureSignature {
    pub const fn new(gesture: GestureType, curls: [f32; 5]) -> Self {
        Self { gesture, curls }
    }

    fn distance_squared(&self, curls: &[f32; 5]) -> f32 {
        self.curls
            .iter()
            .zip(curls)
            .map(|(expected, actual)| (expected - actual) * (expected - actual))
            .sum()
    }
}

/// Canonical signature table, in tie-breaking order
pub const DEFAULT_SIGNATURES: [GestureSignature; 6] = [
    GestureSignature::new(GestureType::Five, [0.0, 0.0, 0.0, 0.0, 0.0]),
    GestureSignature::new(GestureType::Fist, [1.0, 1.0, 1.0, 1.0, 1.0]),
    GestureSignature::new(GestureType::Ok, [0.6, 0.7, 0.0, 0.0, 0.0]),
    GestureSignature::new(GestureType::Gun, [0.0, 0.0, 1.0, 1.0, 1.0]),
    GestureSignature::new(GestureType::Like, [0.0, 1.0, 1.0, 1.0, 1.0]),
    GestureSignature::new(GestureType::Pointing, [1.0, 0.0, 1.0, 1.0, 1.0]),
];

/// Nearest-match lookup over a signature table
#[derive(Debug, Clone, PartialEq)]
pub struct GestureClassifier {
    signatures: Vec<GestureSignature>,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self {
            signatures: DEFAULT_SIGNATURES.to_vec(),
        }
    }
}

impl GestureClassifier {
    /// Custom table; an empty table falls back to the canonical one
    pub fn new(signatures: Vec<GestureSignature>) -> Self {
        if signatures.is_empty() {
            Self::default()
        } else {
            Self { signatures }
        }
    }

    pub fn signatures(&self) -> &[GestureSignature] {
        &self.signatures
    }

    /// Closest signature by squared distance over curls clamped to `[0, 1]`.
    /// Exact ties, and NaN inputs, resolve to the earliest table entry.
    pub fn classify(&self, thumb: f32, index: f32, middle: f32, ring: f32, pinky: f32) -> GestureType {
        let curls = [thumb, index, middle, ring, pinky].map(|c| c.clamp(0.0, 1.0));

        let mut best = self.signatures[0].gesture;
        let mut best_distance = f32::INFINITY;
        for signature in &self.signatures {
            let distance = signature.distance_squared(&curls);
            if distance < best_distance {
                best = signature.gesture;
                best_distance = distance;
            }
        }
        best
    }
}

/// Classify with the canonical table
pub fn gesture_from_angles(thumb: f32, index: f32, middle: f32, ring: f32, pinky: f32) -> GestureType {
    GestureClassifier::default().classify(thumb, index, middle, ring, pinky)
}
