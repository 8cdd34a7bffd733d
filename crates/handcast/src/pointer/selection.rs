//! Selection policies layered on top of the caster
//!
//! A [`SelectionStrategy`] turns the current frame into a continuous value and
//! a threshold. [`SelectionHysteresis`] turns that pair into a stable on/off
//! state, with a dead band below the threshold so a value hovering around it
//! does not flicker.

use super::frame::PointerFrame;
use crate::tracking::{Finger, Handedness};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIDENCE_INTERVAL: f32 = 0.95;
pub const DEFAULT_GRAB_THRESHOLD: f32 = 0.5;
pub const DEFAULT_PINCH_TRIGGER_DISTANCE: f32 = 0.0015;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    #[default]
    NotSelecting,
    Selecting,
}

/// Result of feeding one value to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTransition {
    /// NotSelecting -> Selecting
    Started,
    /// Stayed Selecting
    Held,
    /// Selecting -> NotSelecting
    Released,
    /// Stayed NotSelecting
    Idle,
}

impl SelectionTransition {
    pub fn is_selecting(self) -> bool {
        matches!(self, Self::Started | Self::Held)
    }
}

/// Two-state selection machine with a confidence dead band
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionHysteresis {
    confidence_interval: f32,
    state: SelectionState,
}

impl Default for SelectionHysteresis {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_INTERVAL)
    }
}

impl SelectionHysteresis {
    /// `confidence_interval` is clamped to `[0, 1]`; NaN becomes the default
    pub fn new(confidence_interval: f32) -> Self {
        let confidence_interval = if confidence_interval.is_nan() {
            DEFAULT_CONFIDENCE_INTERVAL
        } else {
            confidence_interval.clamp(0.0, 1.0)
        };
        Self {
            confidence_interval,
            state: SelectionState::NotSelecting,
        }
    }

    pub fn confidence_interval(&self) -> f32 {
        self.confidence_interval
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_selecting(&self) -> bool {
        self.state == SelectionState::Selecting
    }

    /// Enter at `value >= threshold`, leave at `value < threshold * interval`
    pub fn update(&mut self, value: f32, threshold: f32) -> SelectionTransition {
        match self.state {
            SelectionState::NotSelecting if value >= threshold => {
                self.state = SelectionState::Selecting;
                SelectionTransition::Started
            }
            SelectionState::NotSelecting => SelectionTransition::Idle,
            SelectionState::Selecting if value >= threshold * self.confidence_interval => {
                SelectionTransition::Held
            }
            SelectionState::Selecting => {
                self.state = SelectionState::NotSelecting;
                SelectionTransition::Released
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = SelectionState::NotSelecting;
    }
}

/// Supplies the value and threshold a pointer selects on
pub trait SelectionStrategy {
    fn selection_value(&self, frame: &PointerFrame<'_>) -> f32;

    fn selection_threshold(&self) -> f32;
}

/// Selects when the hand closes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabSelection {
    pub hand: Handedness,
    pub threshold: f32,
}

impl GrabSelection {
    pub fn new(hand: Handedness) -> Self {
        Self {
            hand,
            threshold: DEFAULT_GRAB_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

impl SelectionStrategy for GrabSelection {
    /// Grab strength of the hand; 0 while it is not tracked
    fn selection_value(&self, frame: &PointerFrame<'_>) -> f32 {
        frame
            .hand(self.hand)
            .map(|hand| hand.grab_strength())
            .unwrap_or(0.0)
    }

    fn selection_threshold(&self) -> f32 {
        self.threshold
    }
}

/// Selects on the world distance between two fingertips
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchViewfinderSelection {
    pub hand: Handedness,
    pub first: Finger,
    pub second: Finger,
    pub trigger_distance: f32,
}

impl PinchViewfinderSelection {
    pub fn new(hand: Handedness) -> Self {
        Self {
            hand,
            first: Finger::Thumb,
            second: Finger::Index,
            trigger_distance: DEFAULT_PINCH_TRIGGER_DISTANCE,
        }
    }

    pub fn with_fingers(mut self, first: Finger, second: Finger) -> Self {
        self.first = first;
        self.second = second;
        self
    }

    pub fn with_trigger_distance(mut self, trigger_distance: f32) -> Self {
        self.trigger_distance = trigger_distance;
        self
    }
}

impl SelectionStrategy for PinchViewfinderSelection {
    fn selection_value(&self, frame: &PointerFrame<'_>) -> f32 {
        match frame.hand(self.hand) {
            Some(hand) => hand
                .finger_tip_world(self.first)
                .distance(&hand.finger_tip_world(self.second)),
            None => 0.0,
        }
    }

    fn selection_threshold(&self) -> f32 {
        self.trigger_distance
    }
}

/// Selects on a caller-supplied analog value, such as a controller trigger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalSelection {
    pub threshold: f32,
}

impl ExternalSelection {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl SelectionStrategy for ExternalSelection {
    fn selection_value(&self, frame: &PointerFrame<'_>) -> f32 {
        frame.external_value
    }

    fn selection_threshold(&self) -> f32 {
        self.threshold
    }
}
