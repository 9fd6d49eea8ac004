//! Gesture modes and the debounced mode classifier.
//!
//! One mode is active at a time. A raw finger pattern maps to a candidate
//! mode through a fixed table; the candidate must hold for a configurable
//! number of consecutive frames before it replaces the active mode, which
//! keeps single noisy frames from flickering the interaction state.

use serde::{Deserialize, Serialize};

use crate::landmark::FingerExtensions;

/// The discrete interaction state derived from which fingers are extended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureMode {
    /// No recognized gesture; nothing happens.
    #[default]
    Idle,
    /// Thumb + index: the index fingertip draws.
    Drawing,
    /// Thumb + index + middle: hover without drawing.
    Moving,
    /// Thumb + middle: the middle fingertip erases.
    Erasing,
    /// Thumb + pinky: wipe the whole canvas.
    Clearing,
    /// Index + middle, thumb retracted: recognize and interpret.
    Analyzing,
}

impl GestureMode {
    /// Map a finger-extension pattern to its mode.
    ///
    /// Patterns outside the table resolve to [`GestureMode::Idle`].
    #[must_use]
    pub fn from_extensions(ext: FingerExtensions) -> Self {
        match (ext.thumb, ext.index, ext.middle, ext.ring, ext.pinky) {
            (true, true, false, false, false) => Self::Drawing,
            (true, true, true, false, false) => Self::Moving,
            (true, false, true, false, false) => Self::Erasing,
            (true, false, false, false, true) => Self::Clearing,
            (false, true, true, false, false) => Self::Analyzing,
            _ => Self::Idle,
        }
    }
}

impl std::fmt::Display for GestureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Drawing => "drawing",
            Self::Moving => "moving",
            Self::Erasing => "erasing",
            Self::Clearing => "clearing",
            Self::Analyzing => "analyzing",
        };
        write!(f, "{name}")
    }
}

/// A committed mode change, reported exactly once per transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeTransition {
    /// The mode being left.
    pub from: GestureMode,
    /// The mode being entered.
    pub to: GestureMode,
    /// Timestamp of the frame that committed the transition.
    pub timestamp_ms: u64,
}

/// Configuration for mode classification.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Consecutive frames a candidate mode must hold before it becomes
    /// active.
    pub debounce_frames: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { debounce_frames: 3 }
    }
}

/// Debounced gesture-mode state machine.
#[derive(Debug, Default)]
pub struct ModeClassifier {
    active: GestureMode,
    candidate: Option<GestureMode>,
    candidate_frames: u32,
    config: ClassifierConfig,
}

impl ModeClassifier {
    /// Create a classifier starting in [`GestureMode::Idle`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The currently active mode.
    #[must_use]
    pub const fn active(&self) -> GestureMode {
        self.active
    }

    /// Get the current configuration.
    #[must_use]
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Feed one frame's finger pattern (or `None` for a dropped frame).
    ///
    /// Dropped frames leave both the active mode and the pending candidate
    /// untouched, so a brief occlusion neither switches modes nor resets
    /// progress toward a switch. Returns the transition event when the
    /// debounce threshold commits a new active mode.
    pub fn observe(
        &mut self,
        extensions: Option<FingerExtensions>,
        timestamp_ms: u64,
    ) -> Option<ModeTransition> {
        let observed = GestureMode::from_extensions(extensions?);

        if observed == self.active {
            self.candidate = None;
            self.candidate_frames = 0;
            return None;
        }

        if self.candidate == Some(observed) {
            self.candidate_frames += 1;
        } else {
            self.candidate = Some(observed);
            self.candidate_frames = 1;
        }

        if self.candidate_frames < self.config.debounce_frames {
            return None;
        }

        let transition = ModeTransition {
            from: self.active,
            to: observed,
            timestamp_ms,
        };
        tracing::debug!(from = %transition.from, to = %transition.to, "Mode transition");
        self.active = observed;
        self.candidate = None;
        self.candidate_frames = 0;
        Some(transition)
    }

    /// Reset to Idle, forgetting any pending candidate.
    pub fn reset(&mut self) {
        self.active = GestureMode::Idle;
        self.candidate = None;
        self.candidate_frames = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawing() -> FingerExtensions {
        FingerExtensions::new(true, true, false, false, false)
    }

    fn erasing() -> FingerExtensions {
        FingerExtensions::new(true, false, true, false, false)
    }

    fn fist() -> FingerExtensions {
        FingerExtensions::new(false, false, false, false, false)
    }

    #[test]
    fn test_mapping_table() {
        assert_eq!(GestureMode::from_extensions(drawing()), GestureMode::Drawing);
        assert_eq!(
            GestureMode::from_extensions(FingerExtensions::new(true, true, true, false, false)),
            GestureMode::Moving
        );
        assert_eq!(GestureMode::from_extensions(erasing()), GestureMode::Erasing);
        assert_eq!(
            GestureMode::from_extensions(FingerExtensions::new(true, false, false, false, true)),
            GestureMode::Clearing
        );
        assert_eq!(
            GestureMode::from_extensions(FingerExtensions::new(false, true, true, false, false)),
            GestureMode::Analyzing
        );
    }

    #[test]
    fn test_ambiguous_patterns_resolve_to_idle() {
        // All five extended, or ring-only, match nothing in the table.
        assert_eq!(
            GestureMode::from_extensions(FingerExtensions::new(true, true, true, true, true)),
            GestureMode::Idle
        );
        assert_eq!(
            GestureMode::from_extensions(FingerExtensions::new(false, false, false, true, false)),
            GestureMode::Idle
        );
    }

    #[test]
    fn test_debounce_requires_consecutive_frames() {
        let mut classifier = ModeClassifier::new();

        assert!(classifier.observe(Some(drawing()), 0).is_none());
        assert!(classifier.observe(Some(drawing()), 33).is_none());
        assert_eq!(classifier.active(), GestureMode::Idle);

        let transition = classifier
            .observe(Some(drawing()), 66)
            .expect("third frame commits");
        assert_eq!(transition.from, GestureMode::Idle);
        assert_eq!(transition.to, GestureMode::Drawing);
        assert_eq!(transition.timestamp_ms, 66);
        assert_eq!(classifier.active(), GestureMode::Drawing);
    }

    #[test]
    fn test_single_outlier_never_switches() {
        let mut classifier = ModeClassifier::new();
        for t in 0..3 {
            classifier.observe(Some(drawing()), t * 33);
        }
        assert_eq!(classifier.active(), GestureMode::Drawing);

        // One noisy erasing frame, then back to drawing.
        assert!(classifier.observe(Some(erasing()), 99).is_none());
        assert!(classifier.observe(Some(drawing()), 132).is_none());
        assert_eq!(classifier.active(), GestureMode::Drawing);
    }

    #[test]
    fn test_interrupted_candidate_restarts_count() {
        let mut classifier = ModeClassifier::new();
        classifier.observe(Some(drawing()), 0);
        classifier.observe(Some(drawing()), 33);
        // A different pattern resets the streak.
        classifier.observe(Some(fist()), 66);
        assert!(classifier.observe(Some(drawing()), 99).is_none());
        assert!(classifier.observe(Some(drawing()), 132).is_none());
        assert!(classifier.observe(Some(drawing()), 165).is_some());
    }

    #[test]
    fn test_dropped_frames_preserve_state() {
        let mut classifier = ModeClassifier::new();
        classifier.observe(Some(drawing()), 0);
        classifier.observe(Some(drawing()), 33);
        // An occluded frame mid-streak does not reset progress.
        assert!(classifier.observe(None, 66).is_none());
        assert!(classifier.observe(Some(drawing()), 99).is_some());
        assert_eq!(classifier.active(), GestureMode::Drawing);
    }

    #[test]
    fn test_transition_reported_once() {
        let mut classifier = ModeClassifier::new();
        let mut transitions = 0;
        for t in 0..10 {
            if classifier.observe(Some(drawing()), t * 33).is_some() {
                transitions += 1;
            }
        }
        assert_eq!(transitions, 1);
    }

    #[test]
    fn test_custom_debounce() {
        let mut classifier = ModeClassifier::with_config(ClassifierConfig { debounce_frames: 1 });
        assert!(classifier.observe(Some(drawing()), 0).is_some());
    }

    #[test]
    fn test_reset() {
        let mut classifier = ModeClassifier::new();
        for t in 0..3 {
            classifier.observe(Some(drawing()), t * 33);
        }
        classifier.reset();
        assert_eq!(classifier.active(), GestureMode::Idle);
    }
}
