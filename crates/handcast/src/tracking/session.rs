//! Provider registry and the per-tick hand tracking session

use super::bones::Handedness;
use super::hand::{Hand, HandGesture};
use super::provider::{ProviderMetadata, SkeletonSample, TrackingProvider};
use crate::error::{HandcastError, Result};
use crate::spatial::Pose;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Provider lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderState {
    /// Registered but not initialized
    Registered,
    /// Initialized and eligible for selection
    Active,
    /// Initialization or cleanup failed
    Error,
    Shutdown,
}

struct ProviderEntry {
    provider: Box<dyn TrackingProvider>,
    state: ProviderState,
}

/// Ordered set of tracking providers. Registration order is priority order.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<ProviderEntry>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider; ids must be unique
    pub fn register(&mut self, provider: Box<dyn TrackingProvider>) -> Result<()> {
        let id = provider.metadata().id.clone();
        if self.position(&id).is_some() {
            return Err(HandcastError::DuplicateProvider(id));
        }

        debug!("Registered tracking provider '{}'", id);
        self.entries.push(ProviderEntry {
            provider,
            state: ProviderState::Registered,
        });
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.provider.metadata().id == id)
    }

    /// Initialize one registered provider
    pub fn init_provider(&mut self, id: &str) -> Result<()> {
        let index = self
            .position(id)
            .ok_or_else(|| HandcastError::ProviderNotFound(id.to_string()))?;
        let entry = &mut self.entries[index];

        if entry.state != ProviderState::Registered {
            return Err(HandcastError::Provider {
                id: id.to_string(),
                message: format!("cannot initialize from state {:?}", entry.state),
            });
        }

        match entry.provider.init() {
            Ok(()) => {
                entry.state = ProviderState::Active;
                Ok(())
            }
            Err(e) => {
                entry.state = ProviderState::Error;
                Err(e)
            }
        }
    }

    /// Initialize every registered provider, returning the ids that failed
    pub fn init_all(&mut self) -> Vec<String> {
        let ids: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.state == ProviderState::Registered)
            .map(|entry| entry.provider.metadata().id.clone())
            .collect();

        let mut failed = Vec::new();
        for id in ids {
            if let Err(e) = self.init_provider(&id) {
                error!("Failed to initialize tracking provider '{}': {}", id, e);
                failed.push(id);
            }
        }
        failed
    }

    /// Shut down every active provider
    pub fn cleanup_all(&mut self) {
        for entry in &mut self.entries {
            if entry.state != ProviderState::Active {
                continue;
            }
            let id = entry.provider.metadata().id.clone();
            match entry.provider.cleanup() {
                Ok(()) => entry.state = ProviderState::Shutdown,
                Err(e) => {
                    error!("Failed to clean up tracking provider '{}': {}", id, e);
                    entry.state = ProviderState::Error;
                }
            }
        }
    }

    pub fn state(&self, id: &str) -> Option<ProviderState> {
        self.position(id).map(|index| self.entries[index].state)
    }

    pub fn metadata(&self, id: &str) -> Option<&ProviderMetadata> {
        self.position(id)
            .map(|index| self.entries[index].provider.metadata())
    }

    /// First active provider whose device is present
    pub fn first_available(&mut self) -> Option<&mut dyn TrackingProvider> {
        for entry in &mut self.entries {
            if entry.state == ProviderState::Active && entry.provider.is_present() {
                return Some(entry.provider.as_mut());
            }
        }
        None
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.provider.metadata().id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Session diagnostics switches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    /// Log provider selection and missing-provider warnings
    pub verbose: bool,
    pub hide_warnings: bool,
    pub hide_errors: bool,
    /// Log per-hand strengths and gesture every tick
    pub show_tracking_data: bool,
}

impl TrackingSettings {
    /// Missing providers are only reported in verbose mode
    pub fn warns_without_provider(&self) -> bool {
        self.verbose && !self.hide_warnings
    }
}

/// What a session tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingOutcome {
    /// No active, present provider; both hands deactivated
    NoProvider,
    /// Hands updated from skeleton data
    Skeleton,
    /// Hands updated from provider gestures
    Gesture,
    /// The provider failed to deliver any data
    Failed,
}

/// Owns both hands and drives them from the first available provider
pub struct HandTrackingSession {
    registry: ProviderRegistry,
    settings: TrackingSettings,
    left: Hand,
    right: Hand,
    current_provider: Option<String>,
}

impl HandTrackingSession {
    pub fn new(registry: ProviderRegistry, settings: TrackingSettings) -> Self {
        Self {
            registry,
            settings,
            left: Hand::new(Handedness::Left),
            right: Hand::new(Handedness::Right),
            current_provider: None,
        }
    }

    /// Replace the default hands, e.g. to supply a measured rest pose
    pub fn with_hands(mut self, left: Hand, right: Hand) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ProviderRegistry {
        &mut self.registry
    }

    pub fn settings(&self) -> &TrackingSettings {
        &self.settings
    }

    pub fn hand(&self, handedness: Handedness) -> &Hand {
        match handedness {
            Handedness::Left => &self.left,
            Handedness::Right => &self.right,
        }
    }

    pub fn left(&self) -> &Hand {
        &self.left
    }

    pub fn right(&self) -> &Hand {
        &self.right
    }

    /// Id of the provider used on the last tick
    pub fn current_provider(&self) -> Option<&str> {
        self.current_provider.as_deref()
    }

    /// Pull one frame from the first available provider into both hands
    pub fn tick(&mut self, camera: &Pose) -> TrackingOutcome {
        let settings = &self.settings;
        let provider = match self.registry.first_available() {
            Some(provider) => provider,
            None => {
                self.left.is_active = false;
                self.right.is_active = false;
                self.current_provider = None;
                if settings.warns_without_provider() {
                    warn!("No hand tracking provider available");
                }
                return TrackingOutcome::NoProvider;
            }
        };

        let id = provider.metadata().id.clone();
        if self.current_provider.as_deref() != Some(id.as_str()) {
            if settings.verbose {
                info!("Using hand tracking provider '{}'", id);
            }
            self.current_provider = Some(id.clone());
        }

        if provider.can_have_skeleton() {
            match provider.skeleton(camera) {
                Ok(frame) => {
                    apply_skeleton(&mut self.left, frame.left.as_ref(), settings);
                    apply_skeleton(&mut self.right, frame.right.as_ref(), settings);
                    self.log_hands();
                    return TrackingOutcome::Skeleton;
                }
                Err(e) => {
                    if !settings.hide_errors {
                        error!("Provider '{}' failed to deliver a skeleton: {}", id, e);
                    }
                }
            }
        }

        match provider.gesture(camera) {
            Ok(frame) => {
                apply_gesture(&mut self.left, frame.left.as_ref());
                apply_gesture(&mut self.right, frame.right.as_ref());
                self.log_hands();
                TrackingOutcome::Gesture
            }
            Err(e) => {
                if !settings.hide_errors {
                    error!("Provider '{}' failed to deliver gestures: {}", id, e);
                }
                self.left.is_active = false;
                self.right.is_active = false;
                TrackingOutcome::Failed
            }
        }
    }

    /// Clean up all providers
    pub fn shutdown(&mut self) {
        self.registry.cleanup_all();
        self.current_provider = None;
    }

    fn log_hands(&self) {
        if !self.settings.show_tracking_data {
            return;
        }
        for hand in [&self.left, &self.right] {
            if hand.is_active {
                info!(
                    hand = hand.handedness().as_str(),
                    grab = hand.grab_strength(),
                    pinch = hand.pinch_strength(),
                    gesture = hand.gesture().as_str(),
                    "hand state"
                );
            }
        }
    }
}

fn apply_skeleton(hand: &mut Hand, sample: Option<&SkeletonSample>, settings: &TrackingSettings) {
    let Some(sample) = sample else {
        hand.is_active = false;
        return;
    };

    match hand.apply_skeleton(&sample.rotations, sample.root) {
        Ok(()) => {
            hand.skeleton_confidence = sample.confidence;
            hand.is_active = true;
        }
        Err(e) => {
            if !settings.hide_errors {
                error!("Dropping {} hand skeleton: {}", hand.handedness().as_str(), e);
            }
            hand.is_active = false;
        }
    }
}

fn apply_gesture(hand: &mut Hand, gesture: Option<&HandGesture>) {
    match gesture {
        Some(gesture) => {
            hand.apply_gesture(gesture);
            hand.is_active = true;
        }
        None => hand.is_active = false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Quaternion, Vector3D};
    use crate::tracking::gesture::GestureType;
    use crate::tracking::provider::{
        DeviceClass, GestureFrame, ScriptedProvider, SkeletonFrame, SkeletonSample,
    };

    struct BrokenProvider {
        metadata: ProviderMetadata,
        fail_init: bool,
    }

    impl BrokenProvider {
        fn new(id: &str, fail_init: bool) -> Self {
            Self {
                metadata: ProviderMetadata::new(id, id, DeviceClass::Glove),
                fail_init,
            }
        }
    }

    impl TrackingProvider for BrokenProvider {
        fn metadata(&self) -> &ProviderMetadata {
            &self.metadata
        }

        fn init(&mut self) -> Result<()> {
            if self.fail_init {
                return Err(HandcastError::Provider {
                    id: self.metadata.id.clone(),
                    message: "device not responding".to_string(),
                });
            }
            Ok(())
        }

        fn is_present(&self) -> bool {
            true
        }

        fn can_have_skeleton(&self) -> bool {
            true
        }

        fn skeleton(&mut self, _camera: &Pose) -> Result<SkeletonFrame> {
            Err(HandcastError::Provider {
                id: self.metadata.id.clone(),
                message: "skeleton stream lost".to_string(),
            })
        }

        fn gesture(&mut self, _camera: &Pose) -> Result<GestureFrame> {
            Ok(GestureFrame {
                left: None,
                right: Some(HandGesture {
                    gesture: GestureType::Pointing,
                    root: Pose::IDENTITY,
                    grab_strength: 0.3,
                    pinch_strength: 0.1,
                }),
            })
        }
    }

    fn open_sample(confidence: f32) -> SkeletonSample {
        SkeletonSample::new(
            Pose::from_position(Vector3D::new(0.2, 1.0, 0.3)),
            vec![Quaternion::IDENTITY; 22],
            confidence,
        )
    }

    fn boxed(provider: impl TrackingProvider + 'static) -> Box<dyn TrackingProvider> {
        Box::new(provider)
    }

    fn session_with(providers: Vec<Box<dyn TrackingProvider>>) -> HandTrackingSession {
        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register(provider).unwrap();
        }
        registry.init_all();
        HandTrackingSession::new(registry, TrackingSettings::default())
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(ScriptedProvider::new("a"))).unwrap();
        let err = registry
            .register(Box::new(ScriptedProvider::new("a")))
            .unwrap_err();
        assert!(matches!(err, HandcastError::DuplicateProvider(id) if id == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_init_all_reports_failures() {
        let mut registry = ProviderRegistry::new();
        registry.register(Box::new(BrokenProvider::new("bad", true))).unwrap();
        registry.register(Box::new(ScriptedProvider::new("good"))).unwrap();

        let failed = registry.init_all();
        assert_eq!(failed, vec!["bad".to_string()]);
        assert_eq!(registry.state("bad"), Some(ProviderState::Error));
        assert_eq!(registry.state("good"), Some(ProviderState::Active));
        assert_eq!(
            registry.first_available().map(|p| p.metadata().id.clone()),
            Some("good".to_string())
        );

        registry.cleanup_all();
        assert_eq!(registry.state("good"), Some(ProviderState::Shutdown));
        assert!(registry.first_available().is_none());
    }

    #[test]
    fn test_init_unknown_provider() {
        let mut registry = ProviderRegistry::new();
        assert!(matches!(
            registry.init_provider("ghost"),
            Err(HandcastError::ProviderNotFound(_))
        ));
    }

    #[test]
    fn test_no_provider_deactivates_hands() {
        let mut scripted = ScriptedProvider::new("script")
            .with_skeletons(vec![SkeletonFrame {
                left: Some(open_sample(1.0)),
                right: Some(open_sample(1.0)),
            }]);
        scripted.set_present(false);
        let mut session = session_with(vec![boxed(scripted)]);

        assert_eq!(session.tick(&Pose::IDENTITY), TrackingOutcome::NoProvider);
        assert!(!session.left().is_active);
        assert!(!session.right().is_active);
        assert_eq!(session.current_provider(), None);
    }

    #[test]
    fn test_missing_provider_warning_needs_verbose() {
        let quiet = TrackingSettings::default();
        assert!(!quiet.warns_without_provider());

        let verbose = TrackingSettings {
            verbose: true,
            ..TrackingSettings::default()
        };
        assert!(verbose.warns_without_provider());

        let hidden = TrackingSettings {
            verbose: true,
            hide_warnings: true,
            ..TrackingSettings::default()
        };
        assert!(!hidden.warns_without_provider());
    }

    #[test]
    fn test_losing_provider_clears_current() {
        let scripted = ScriptedProvider::new("script").with_skeletons(vec![SkeletonFrame {
            left: None,
            right: Some(open_sample(1.0)),
        }]);
        let mut session = session_with(vec![boxed(scripted)]);
        assert_eq!(session.tick(&Pose::IDENTITY), TrackingOutcome::Skeleton);
        assert_eq!(session.current_provider(), Some("script"));

        session.registry_mut().cleanup_all();
        assert_eq!(session.tick(&Pose::IDENTITY), TrackingOutcome::NoProvider);
        assert_eq!(session.current_provider(), None);
        assert!(!session.right().is_active);
    }

    #[test]
    fn test_skeleton_tick_updates_each_hand() {
        let scripted = ScriptedProvider::new("script").with_skeletons(vec![SkeletonFrame {
            left: Some(open_sample(0.25)),
            right: Some(open_sample(0.75)),
        }]);
        let mut session = session_with(vec![boxed(scripted)]);

        assert_eq!(session.tick(&Pose::IDENTITY), TrackingOutcome::Skeleton);
        assert_eq!(session.current_provider(), Some("script"));

        let left = session.hand(Handedness::Left);
        let right = session.hand(Handedness::Right);
        assert!(left.is_active && right.is_active);
        assert!(!right.uses_gestures);
        assert_eq!(left.skeleton_confidence, 0.25);
        assert_eq!(right.skeleton_confidence, 0.75);
        assert_eq!(right.gesture(), GestureType::Five);
        assert_eq!(right.root().position, Vector3D::new(0.2, 1.0, 0.3));
    }

    #[test]
    fn test_short_skeleton_deactivates_only_that_hand() {
        let mut short = open_sample(1.0);
        short.rotations.truncate(10);
        let scripted = ScriptedProvider::new("script").with_skeletons(vec![SkeletonFrame {
            left: Some(short),
            right: Some(open_sample(1.0)),
        }]);
        let mut session = session_with(vec![boxed(scripted)]);

        session.tick(&Pose::IDENTITY);
        assert!(!session.left().is_active);
        assert!(session.right().is_active);
    }

    #[test]
    fn test_skeleton_failure_falls_back_to_gestures() {
        let mut session = session_with(vec![boxed(BrokenProvider::new("glove", false))]);

        assert_eq!(session.tick(&Pose::IDENTITY), TrackingOutcome::Gesture);
        assert!(!session.left().is_active);
        let right = session.right();
        assert!(right.is_active && right.uses_gestures);
        assert_eq!(right.gesture(), GestureType::Pointing);
        assert!((right.grab_strength() - 0.3).abs() < 0.0001);
    }

    #[test]
    fn test_registration_order_is_priority() {
        let first = ScriptedProvider::new("first").with_gestures(vec![GestureFrame::default()]);
        let second = ScriptedProvider::new("second").with_skeletons(vec![SkeletonFrame::default()]);
        let mut session = session_with(vec![boxed(first), boxed(second)]);

        assert_eq!(session.tick(&Pose::IDENTITY), TrackingOutcome::Gesture);
        assert_eq!(session.current_provider(), Some("first"));
    }
}
