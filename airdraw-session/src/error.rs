//! Error types for session operations.

use thiserror::Error;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur in session hosting.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A frame or control call arrived before `start` or after `stop`.
    /// This is a caller programming error and fails fast.
    #[error("Session not active: {0}")]
    NotActive(String),

    /// `start_session` was called for an id that is already active.
    #[error("Session already active: {0}")]
    AlreadyActive(String),

    /// Core canvas operation failed.
    #[error(transparent)]
    Core(#[from] airdraw_core::CoreError),
}
