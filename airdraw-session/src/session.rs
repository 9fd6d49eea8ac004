//! One drawing session: lifecycle, per-frame pipeline, and the
//! interpretation task slot.
//!
//! A session owns its canvas and classifier outright; every mutation
//! happens on the synchronous frame path, so there is no locking. The
//! only thing that ever suspends is the handoff to the interpretation
//! collaborator, which runs in a single cancellable task with
//! last-request-wins semantics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use airdraw_core::{
    CanvasConfig, CanvasSnapshot, ClassifierConfig, FrameNormalizer, GestureMode, LandmarkFrame,
    ModeClassifier, ModeTransition, NormalizerConfig, RecognizedShape, RecognizerConfig,
    ShapeRecognizer, StrokeCanvas, StrokePoint,
};

use crate::error::{SessionError, SessionResult};
use crate::interpret::{InterpretationOutcome, InterpretationRequest, ShapeInterpreter};

/// Default canvas width in pixels.
const DEFAULT_WIDTH: f32 = 950.0;

/// Default canvas height in pixels.
const DEFAULT_HEIGHT: f32 = 550.0;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Created but not started; frames are rejected.
    Uninitialized,
    /// Accepting frames.
    Active,
    /// Stopped; the canvas is gone and frames are rejected.
    Ended,
}

/// Configuration for a session and the core stages it drives.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Canvas dimensions in pixels.
    pub canvas_size: (f32, f32),
    /// Frame normalizer thresholds.
    pub normalizer: NormalizerConfig,
    /// Mode classifier debounce.
    pub classifier: ClassifierConfig,
    /// Canvas spacing/erase/timeout settings.
    pub canvas: CanvasConfig,
    /// Shape recognition thresholds.
    pub recognizer: RecognizerConfig,
}

impl SessionConfig {
    /// Canvas width, falling back to the default when unset.
    #[must_use]
    fn width(&self) -> f32 {
        if self.canvas_size.0 > 0.0 {
            self.canvas_size.0
        } else {
            DEFAULT_WIDTH
        }
    }

    /// Canvas height, falling back to the default when unset.
    #[must_use]
    fn height(&self) -> f32 {
        if self.canvas_size.1 > 0.0 {
            self.canvas_size.1
        } else {
            DEFAULT_HEIGHT
        }
    }
}

/// What one `submit_frame` call reports back.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// The active mode after this frame.
    pub mode: GestureMode,
    /// The transition this frame committed, if any.
    pub transition: Option<ModeTransition>,
    /// Render-ready canvas state after this frame.
    pub snapshot: CanvasSnapshot,
}

/// One logical camera session.
pub struct Session {
    id: String,
    phase: SessionPhase,
    config: SessionConfig,
    normalizer: FrameNormalizer,
    classifier: ModeClassifier,
    recognizer: ShapeRecognizer,
    canvas: Option<StrokeCanvas>,
    interpreter: Arc<dyn ShapeInterpreter>,
    /// The single in-flight interpretation task, if any.
    in_flight: Option<JoinHandle<()>>,
    /// Bumped on every dispatch and on teardown; a task whose generation
    /// no longer matches discards its result.
    generation: Arc<AtomicU64>,
    outcome_tx: Option<mpsc::UnboundedSender<InterpretationOutcome>>,
}

impl Session {
    /// Create an uninitialized session with default configuration.
    #[must_use]
    pub fn new(id: impl Into<String>, interpreter: Arc<dyn ShapeInterpreter>) -> Self {
        Self::with_config(id, interpreter, SessionConfig::default())
    }

    /// Create with custom configuration.
    #[must_use]
    pub fn with_config(
        id: impl Into<String>,
        interpreter: Arc<dyn ShapeInterpreter>,
        config: SessionConfig,
    ) -> Self {
        Self {
            id: id.into(),
            phase: SessionPhase::Uninitialized,
            normalizer: FrameNormalizer::with_config(config.normalizer.clone()),
            classifier: ModeClassifier::with_config(config.classifier.clone()),
            recognizer: ShapeRecognizer::with_config(config.recognizer.clone()),
            config,
            canvas: None,
            interpreter,
            in_flight: None,
            generation: Arc::new(AtomicU64::new(0)),
            outcome_tx: None,
        }
    }

    /// The session identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The currently active gesture mode.
    #[must_use]
    pub const fn mode(&self) -> GestureMode {
        self.classifier.active()
    }

    /// Start the session: fresh canvas, mode reset to Idle.
    ///
    /// Returns the initial snapshot and the receiver on which
    /// interpretation outcomes are delivered.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyActive`] if already started, or
    /// [`SessionError::NotActive`] if the session has ended.
    pub fn start(
        &mut self,
    ) -> SessionResult<(CanvasSnapshot, mpsc::UnboundedReceiver<InterpretationOutcome>)> {
        match self.phase {
            SessionPhase::Active => return Err(SessionError::AlreadyActive(self.id.clone())),
            SessionPhase::Ended => return Err(SessionError::NotActive(self.id.clone())),
            SessionPhase::Uninitialized => {}
        }

        let canvas = StrokeCanvas::with_config(
            self.config.width(),
            self.config.height(),
            self.config.canvas.clone(),
        );
        let snapshot = canvas.snapshot();
        self.canvas = Some(canvas);
        self.classifier.reset();
        self.phase = SessionPhase::Active;

        let (tx, rx) = mpsc::unbounded_channel();
        self.outcome_tx = Some(tx);

        tracing::info!(session_id = %self.id, "Session started");
        Ok((snapshot, rx))
    }

    /// Process one landmark frame to completion.
    ///
    /// Low-confidence frames are dropped without touching the mode. On a
    /// committed mode transition the corresponding canvas action runs
    /// exactly once; continuous per-frame actions (drawing, erasing)
    /// follow.
    ///
    /// Must be called from within a tokio runtime: an Analyzing
    /// transition spawns the interpretation task.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotActive`] before `start` or after
    /// `stop`.
    pub fn submit_frame(&mut self, frame: &LandmarkFrame) -> SessionResult<FrameReport> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::NotActive(self.id.clone()));
        }

        let extensions = self.normalizer.extensions(frame);

        // The inactivity seal only applies while drawing continues. It
        // also runs on dropped frames: an occluded hand still ages the
        // active stroke.
        if self.classifier.active() == GestureMode::Drawing {
            if let Some(canvas) = self.canvas.as_mut() {
                canvas.check_stroke_timeout(frame.timestamp_ms);
            }
        }

        // A rejected frame mutates nothing; the previous mode persists.
        let Some(extensions) = extensions else {
            return Ok(FrameReport {
                mode: self.classifier.active(),
                transition: None,
                snapshot: self.snapshot_or_empty(),
            });
        };

        let observed = GestureMode::from_extensions(extensions);
        let transition = self.classifier.observe(Some(extensions), frame.timestamp_ms);
        if let Some(t) = transition {
            self.apply_transition(t, frame);
        }

        // Continuous actions only run while the observed pose still
        // matches the active mode; the frames spent debouncing out of a
        // mode would otherwise smear stray points into the stroke.
        if observed == self.classifier.active() {
            self.apply_frame_action(frame)?;
        }

        Ok(FrameReport {
            mode: self.classifier.active(),
            transition,
            snapshot: self.snapshot_or_empty(),
        })
    }

    fn snapshot_or_empty(&self) -> CanvasSnapshot {
        self.canvas.as_ref().map_or_else(
            || CanvasSnapshot {
                width: self.config.width(),
                height: self.config.height(),
                strokes: Vec::new(),
            },
            StrokeCanvas::snapshot,
        )
    }

    /// Dispatch the one-shot action for a committed transition.
    fn apply_transition(&mut self, transition: ModeTransition, frame: &LandmarkFrame) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        if transition.from == GestureMode::Drawing {
            canvas.end_stroke();
        }

        match transition.to {
            GestureMode::Drawing => {
                let tip = frame.index_tip();
                canvas.begin_stroke(StrokePoint::new(tip.x, tip.y, frame.timestamp_ms));
            }
            GestureMode::Clearing => {
                canvas.clear();
            }
            GestureMode::Analyzing => {
                self.dispatch_interpretation();
            }
            GestureMode::Idle | GestureMode::Moving | GestureMode::Erasing => {}
        }
    }

    /// Continuous per-frame action for the active mode.
    fn apply_frame_action(&mut self, frame: &LandmarkFrame) -> SessionResult<()> {
        let mode = self.classifier.active();
        let Some(canvas) = self.canvas.as_mut() else {
            return Ok(());
        };

        match mode {
            GestureMode::Drawing => {
                let tip = frame.index_tip();
                let point = StrokePoint::new(tip.x, tip.y, frame.timestamp_ms);
                if canvas.active_stroke().is_some() {
                    canvas.append_point(point)?;
                } else {
                    // The inactivity timeout sealed the previous stroke;
                    // a fresh one opens once the fingertip actually
                    // moves, so a frozen hand doesn't shed point strokes.
                    let min_spacing = canvas.config().min_spacing;
                    let resumed = canvas
                        .strokes()
                        .last()
                        .and_then(|s| s.last_point())
                        .map_or(true, |last| point.distance_to(last) >= min_spacing);
                    if resumed {
                        canvas.begin_stroke(point);
                    }
                }
            }
            GestureMode::Erasing => {
                let tip = frame.middle_tip();
                let radius = canvas.config().erase_radius;
                canvas.erase_near(tip.x, tip.y, radius);
            }
            _ => {}
        }
        Ok(())
    }

    /// Recognize the completed strokes and hand them to the collaborator.
    ///
    /// Recognition runs inline; only the collaborator call is spawned.
    /// A newer dispatch supersedes an older in-flight one: the old task
    /// is aborted and its generation invalidated, so a result that races
    /// to completion is discarded rather than delivered out of order.
    fn dispatch_interpretation(&mut self) {
        let Some(canvas) = self.canvas.as_ref() else {
            return;
        };
        let Some(tx) = self.outcome_tx.clone() else {
            return;
        };

        let shapes: Vec<RecognizedShape> = canvas
            .complete_strokes()
            .map(|stroke| self.recognizer.recognize(stroke))
            .collect();
        tracing::info!(
            session_id = %self.id,
            shapes = shapes.len(),
            "Analyzing gesture: dispatching shape set"
        );

        if let Some(old) = self.in_flight.take() {
            tracing::debug!(session_id = %self.id, "Superseding in-flight interpretation");
            old.abort();
        }
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let request = InterpretationRequest {
            session_id: self.id.clone(),
            canvas_width: canvas.width(),
            canvas_height: canvas.height(),
            shapes: shapes.clone(),
        };
        let canvas_width = canvas.width();
        let canvas_height = canvas.height();
        let interpreter = Arc::clone(&self.interpreter);
        let generation = Arc::clone(&self.generation);

        self.in_flight = Some(tokio::spawn(async move {
            let result = interpreter.interpret(request).await;
            if generation.load(Ordering::SeqCst) != my_generation {
                tracing::debug!("Discarding superseded interpretation result");
                return;
            }
            let outcome = match result {
                Ok(interpretation) => InterpretationOutcome {
                    shapes,
                    canvas_width,
                    canvas_height,
                    interpretation: Some(interpretation),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("Interpretation unavailable: {e}");
                    InterpretationOutcome {
                        shapes,
                        canvas_width,
                        canvas_height,
                        interpretation: None,
                        error: Some(e.to_string()),
                    }
                }
            };
            let _ = tx.send(outcome);
        }));
    }

    /// Clear the canvas. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotActive`] before `start` or after
    /// `stop`.
    pub fn clear(&mut self) -> SessionResult<CanvasSnapshot> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::NotActive(self.id.clone()));
        }
        let canvas = self
            .canvas
            .as_mut()
            .ok_or_else(|| SessionError::NotActive(self.id.clone()))?;
        canvas.clear();
        Ok(canvas.snapshot())
    }

    /// Stop the session: cancel any in-flight interpretation and discard
    /// the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotActive`] if the session is not active.
    pub fn stop(&mut self) -> SessionResult<CanvasSnapshot> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::NotActive(self.id.clone()));
        }

        // Invalidate before aborting so a task that already passed its
        // abort point still discards.
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        self.outcome_tx = None;

        let snapshot = self.canvas.take().map_or_else(
            || CanvasSnapshot {
                width: self.config.width(),
                height: self.config.height(),
                strokes: Vec::new(),
            },
            |canvas| canvas.snapshot(),
        );
        self.phase = SessionPhase::Ended;
        tracing::info!(session_id = %self.id, "Session stopped");
        Ok(snapshot)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }
}
