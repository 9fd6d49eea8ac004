//! The stroke canvas: freehand strokes accumulated from fingertip motion.
//!
//! The canvas is owned and mutated exclusively by the session's frame
//! path, so none of these operations need internal locking.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Unique identifier for a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrokeId(Uuid);

impl StrokeId {
    /// Create a new unique stroke ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StrokeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StrokeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded fingertip position, immutable once appended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    /// X position in canvas coordinates.
    pub x: f32,
    /// Y position in canvas coordinates.
    pub y: f32,
    /// Timestamp of the frame that recorded the point.
    pub timestamp_ms: u64,
}

impl StrokePoint {
    /// Create a new stroke point.
    #[must_use]
    pub fn new(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self { x, y, timestamp_ms }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One continuous drawn path. Points are in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Unique identifier.
    pub id: StrokeId,
    /// Recorded points, oldest first. Never empty.
    pub points: Vec<StrokePoint>,
    /// Whether the stroke has been sealed.
    pub complete: bool,
}

impl Stroke {
    /// Create a new incomplete stroke from its first point.
    #[must_use]
    pub fn new(first: StrokePoint) -> Self {
        Self {
            id: StrokeId::new(),
            points: vec![first],
            complete: false,
        }
    }

    fn from_points(points: Vec<StrokePoint>, complete: bool) -> Self {
        debug_assert!(!points.is_empty());
        Self {
            id: StrokeId::new(),
            points,
            complete,
        }
    }

    /// Number of recorded points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the stroke has no points. Always false for strokes held by
    /// the canvas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recently recorded point.
    #[must_use]
    pub fn last_point(&self) -> Option<&StrokePoint> {
        self.points.last()
    }
}

/// Configuration for canvas mutation.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Minimum distance from the previous point before a new one is
    /// recorded, suppressing near-duplicates from a stationary hand.
    pub min_spacing: f32,
    /// Radius around the erase cursor within which points are removed.
    pub erase_radius: f32,
    /// Milliseconds without a recorded point before the active stroke is
    /// sealed automatically, judged on frame timestamps.
    pub stroke_timeout_ms: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_spacing: 2.0,
            erase_radius: 20.0,
            stroke_timeout_ms: 500,
        }
    }
}

/// Render-ready view of the canvas: dimensions plus the stroke list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// All strokes, complete and in-progress, in insertion order.
    pub strokes: Vec<Stroke>,
}

impl CanvasSnapshot {
    /// Serialize the snapshot to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(CoreError::Serialization)
    }

    /// Deserialize a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(CoreError::Serialization)
    }
}

/// All strokes of one drawing session.
///
/// Insertion order is preserved; it is the order strokes are handed to
/// the recognizer.
#[derive(Debug)]
pub struct StrokeCanvas {
    width: f32,
    height: f32,
    strokes: Vec<Stroke>,
    active: Option<StrokeId>,
    config: CanvasConfig,
}

impl StrokeCanvas {
    /// Create an empty canvas with the given dimensions.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_config(width, height, CanvasConfig::default())
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(width: f32, height: f32, config: CanvasConfig) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
            active: None,
            config,
        }
    }

    /// Get the current configuration.
    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Canvas width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Begin a new stroke at the given point, sealing any previous one.
    pub fn begin_stroke(&mut self, first: StrokePoint) -> StrokeId {
        if self.active.is_some() {
            self.end_stroke();
        }
        let stroke = Stroke::new(first);
        let id = stroke.id;
        tracing::debug!(%id, "Stroke started");
        self.active = Some(id);
        self.strokes.push(stroke);
        id
    }

    /// Append a point to the active stroke.
    ///
    /// The point is skipped (returning `Ok(false)`) when it lies within
    /// the minimum spacing of the last recorded point.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoActiveStroke`] if no stroke is in progress.
    pub fn append_point(&mut self, point: StrokePoint) -> CoreResult<bool> {
        let min_spacing = self.config.min_spacing;
        let stroke = self
            .active_stroke_mut()
            .ok_or(CoreError::NoActiveStroke)?;
        if let Some(last) = stroke.last_point() {
            if point.distance_to(last) < min_spacing {
                return Ok(false);
            }
        }
        stroke.points.push(point);
        Ok(true)
    }

    /// Seal the active stroke, if any. Returns its ID.
    pub fn end_stroke(&mut self) -> Option<StrokeId> {
        let id = self.active.take()?;
        if let Some(stroke) = self.strokes.iter_mut().find(|s| s.id == id) {
            stroke.complete = true;
            tracing::debug!(%id, points = stroke.len(), "Stroke sealed");
        }
        Some(id)
    }

    /// Seal the active stroke when no point has been recorded for the
    /// configured timeout. Returns the sealed stroke's ID.
    pub fn check_stroke_timeout(&mut self, now_ms: u64) -> Option<StrokeId> {
        let timeout = self.config.stroke_timeout_ms;
        let stale = self
            .active_stroke()
            .and_then(Stroke::last_point)
            .is_some_and(|last| now_ms.saturating_sub(last.timestamp_ms) >= timeout);
        if stale {
            self.end_stroke()
        } else {
            None
        }
    }

    /// Remove all points within `radius` of `(x, y)` across all strokes.
    ///
    /// A stroke whose point sequence is cut into several contiguous runs
    /// is replaced by one stroke per run; runs inherit the parent's
    /// completion state, except that when the in-progress stroke is cut,
    /// only its last surviving run remains in progress. Strokes erased
    /// down to zero points are deleted outright.
    pub fn erase_near(&mut self, x: f32, y: f32, radius: f32) {
        let cursor = StrokePoint::new(x, y, 0);
        let mut erased_any = false;
        let mut result = Vec::with_capacity(self.strokes.len());

        for stroke in self.strokes.drain(..) {
            if !stroke.points.iter().any(|p| p.distance_to(&cursor) <= radius) {
                result.push(stroke);
                continue;
            }

            erased_any = true;
            let was_active = Some(stroke.id) == self.active;
            if was_active {
                self.active = None;
            }

            let mut runs: Vec<Vec<StrokePoint>> = Vec::new();
            let mut current: Vec<StrokePoint> = Vec::new();
            for point in stroke.points {
                if point.distance_to(&cursor) <= radius {
                    if !current.is_empty() {
                        runs.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(point);
                }
            }
            if !current.is_empty() {
                runs.push(current);
            }

            let run_count = runs.len();
            for (i, run) in runs.into_iter().enumerate() {
                let last_run = i + 1 == run_count;
                let keep_in_progress = was_active && !stroke.complete && last_run;
                let fragment = Stroke::from_points(run, stroke.complete || !keep_in_progress);
                if keep_in_progress {
                    self.active = Some(fragment.id);
                }
                result.push(fragment);
            }
        }

        self.strokes = result;
        if erased_any {
            tracing::debug!(x, y, radius, strokes = self.strokes.len(), "Erase applied");
        }
    }

    /// Remove every stroke. Safe to call on an already-empty canvas.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = None;
        tracing::debug!("Canvas cleared");
    }

    /// Number of strokes, complete and in-progress.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Check if the canvas holds no strokes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// All strokes in insertion order.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    /// Completed strokes in insertion order.
    pub fn complete_strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().filter(|s| s.complete)
    }

    /// The in-progress stroke, if any.
    #[must_use]
    pub fn active_stroke(&self) -> Option<&Stroke> {
        let id = self.active?;
        self.strokes.iter().find(|s| s.id == id)
    }

    fn active_stroke_mut(&mut self) -> Option<&mut Stroke> {
        let id = self.active?;
        self.strokes.iter_mut().find(|s| s.id == id)
    }

    /// Produce a render-ready snapshot of the canvas.
    #[must_use]
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            width: self.width,
            height: self.height,
            strokes: self.strokes.clone(),
        }
    }
}
