//! Hand-landmark frames and finger-extension detection.
//!
//! The upstream detector delivers 21 tracked joints per frame in the
//! standard hand layout (wrist at index 0, four joints per finger). This
//! module reduces a frame to the five-finger extension pattern the mode
//! classifier consumes, normalized by hand scale so the result does not
//! depend on how far the hand is from the camera.

use serde::{Deserialize, Serialize};

/// Number of tracked joints per hand.
pub const JOINT_COUNT: usize = 21;

/// Wrist joint index.
pub const WRIST: usize = 0;
/// Thumb fingertip joint index.
pub const THUMB_TIP: usize = 4;
/// Index fingertip joint index.
pub const INDEX_TIP: usize = 8;
/// Middle-finger base (MCP) joint index, the hand-scale reference.
pub const MIDDLE_MCP: usize = 9;
/// Middle fingertip joint index.
pub const MIDDLE_TIP: usize = 12;
/// Ring fingertip joint index.
pub const RING_TIP: usize = 16;
/// Pinky fingertip joint index.
pub const PINKY_TIP: usize = 20;

/// Fingertip joint indices in thumb..pinky order.
const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// One tracked hand joint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// X position in canvas coordinates.
    pub x: f32,
    /// Y position in canvas coordinates.
    pub y: f32,
    /// Detection confidence for this joint (0.0 to 1.0).
    pub confidence: f32,
}

impl Landmark {
    /// Create a new landmark.
    #[must_use]
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }

    /// Euclidean distance to another landmark.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One hand's joint positions for a single camera frame.
///
/// Produced by the external hand-landmark detector, consumed transiently
/// during one frame's processing and never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// All 21 joints, indexed per the standard hand layout.
    pub joints: [Landmark; JOINT_COUNT],
    /// Capture timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl LandmarkFrame {
    /// Create a frame from joint positions and a capture timestamp.
    #[must_use]
    pub fn new(joints: [Landmark; JOINT_COUNT], timestamp_ms: u64) -> Self {
        Self {
            joints,
            timestamp_ms,
        }
    }

    /// Mean detection confidence across all joints.
    #[must_use]
    pub fn mean_confidence(&self) -> f32 {
        let sum: f32 = self.joints.iter().map(|j| j.confidence).sum();
        sum / JOINT_COUNT as f32
    }

    /// The index fingertip, the drawing cursor.
    #[must_use]
    pub fn index_tip(&self) -> &Landmark {
        &self.joints[INDEX_TIP]
    }

    /// The middle fingertip, the erasing cursor.
    #[must_use]
    pub fn middle_tip(&self) -> &Landmark {
        &self.joints[MIDDLE_TIP]
    }
}

/// Which of the five fingers are extended, thumb to pinky.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct FingerExtensions {
    /// Thumb extended.
    pub thumb: bool,
    /// Index finger extended.
    pub index: bool,
    /// Middle finger extended.
    pub middle: bool,
    /// Ring finger extended.
    pub ring: bool,
    /// Pinky extended.
    pub pinky: bool,
}

impl FingerExtensions {
    /// Create from explicit per-finger flags, thumb to pinky.
    #[must_use]
    pub fn new(thumb: bool, index: bool, middle: bool, ring: bool, pinky: bool) -> Self {
        Self {
            thumb,
            index,
            middle,
            ring,
            pinky,
        }
    }

    /// Number of extended fingers.
    #[must_use]
    pub fn count(&self) -> usize {
        usize::from(self.thumb)
            + usize::from(self.index)
            + usize::from(self.middle)
            + usize::from(self.ring)
            + usize::from(self.pinky)
    }
}

/// Configuration for finger-extension detection.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Minimum mean per-joint confidence; frames below it are rejected.
    pub min_confidence: f32,
    /// A finger counts as extended when its tip-to-wrist distance exceeds
    /// this multiple of the wrist-to-middle-base reference distance.
    pub extension_ratio: f32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            extension_ratio: 1.3,
        }
    }
}

/// Reduces landmark frames to finger-extension patterns.
#[derive(Debug, Default)]
pub struct FrameNormalizer {
    config: NormalizerConfig,
}

impl FrameNormalizer {
    /// Create a normalizer with default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    #[must_use]
    pub const fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Compute the finger-extension pattern for a frame.
    ///
    /// Returns `None` when the frame's mean joint confidence is below the
    /// configured minimum, or when the hand-scale reference distance
    /// degenerates to zero; callers treat either as a dropped frame and
    /// keep the previous gesture mode.
    #[must_use]
    pub fn extensions(&self, frame: &LandmarkFrame) -> Option<FingerExtensions> {
        let confidence = frame.mean_confidence();
        if confidence < self.config.min_confidence {
            tracing::debug!(
                confidence,
                threshold = self.config.min_confidence,
                "Dropping low-confidence frame"
            );
            return None;
        }

        let wrist = &frame.joints[WRIST];
        let hand_scale = frame.joints[MIDDLE_MCP].distance_to(wrist);
        if hand_scale <= f32::EPSILON {
            tracing::debug!("Dropping frame with degenerate hand scale");
            return None;
        }

        let mut extended = [false; 5];
        for (flag, &tip) in extended.iter_mut().zip(FINGERTIPS.iter()) {
            let ratio = frame.joints[tip].distance_to(wrist) / hand_scale;
            *flag = ratio > self.config.extension_ratio;
        }

        Some(FingerExtensions {
            thumb: extended[0],
            index: extended[1],
            middle: extended[2],
            ring: extended[3],
            pinky: extended[4],
        })
    }
}
