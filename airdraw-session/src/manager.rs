//! Multi-session registry exposing the session control surface.
//!
//! The hosting transport layer (out of scope here) calls straight into
//! this registry: `start_session`, `submit_frame`, `clear`,
//! `stop_session`. Each call returns the current canvas snapshot so the
//! host always has something to render.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use airdraw_core::{CanvasSnapshot, LandmarkFrame};
use tokio::sync::mpsc;

use crate::error::{SessionError, SessionResult};
use crate::interpret::{InterpretationOutcome, ShapeInterpreter};
use crate::session::{FrameReport, Session, SessionConfig};

/// Default session identifier.
pub const DEFAULT_SESSION: &str = "default";

/// A freshly started session's handle.
pub struct StartedSession {
    /// The (empty) initial canvas snapshot.
    pub snapshot: CanvasSnapshot,
    /// Receiver for interpretation outcomes triggered by Analyzing
    /// gestures in this session.
    pub outcomes: mpsc::UnboundedReceiver<InterpretationOutcome>,
}

/// Thread-safe registry of drawing sessions keyed by id.
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
    interpreter: Arc<dyn ShapeInterpreter>,
    config: SessionConfig,
}

impl SessionManager {
    /// Create a manager dispatching interpretations to `interpreter`.
    #[must_use]
    pub fn new(interpreter: Arc<dyn ShapeInterpreter>) -> Self {
        Self::with_config(interpreter, SessionConfig::default())
    }

    /// Create with custom per-session configuration.
    #[must_use]
    pub fn with_config(interpreter: Arc<dyn ShapeInterpreter>, config: SessionConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            interpreter,
            config,
        }
    }

    /// Start a fresh session under `session_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyActive`] if a session with this id
    /// is already running.
    pub fn start_session(&self, session_id: &str) -> SessionResult<StartedSession> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if sessions.contains_key(session_id) {
            return Err(SessionError::AlreadyActive(session_id.to_string()));
        }

        let mut session = Session::with_config(
            session_id,
            Arc::clone(&self.interpreter),
            self.config.clone(),
        );
        let (snapshot, outcomes) = session.start()?;
        sessions.insert(session_id.to_string(), session);

        Ok(StartedSession { snapshot, outcomes })
    }

    /// Feed one landmark frame to a running session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotActive`] for an unknown or stopped
    /// session id.
    pub fn submit_frame(
        &self,
        session_id: &str,
        frame: &LandmarkFrame,
    ) -> SessionResult<FrameReport> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotActive(session_id.to_string()))?;
        session.submit_frame(frame)
    }

    /// Clear a running session's canvas.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotActive`] for an unknown or stopped
    /// session id.
    pub fn clear(&self, session_id: &str) -> SessionResult<CanvasSnapshot> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotActive(session_id.to_string()))?;
        session.clear()
    }

    /// Stop a session, cancelling any in-flight interpretation.
    ///
    /// The entry is removed, so the id may be reused by a later
    /// `start_session`. Returns the final snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotActive`] for an unknown session id.
    pub fn stop_session(&self, session_id: &str) -> SessionResult<CanvasSnapshot> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut session = sessions
            .remove(session_id)
            .ok_or_else(|| SessionError::NotActive(session_id.to_string()))?;
        session.stop()
    }

    /// Number of running sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}
