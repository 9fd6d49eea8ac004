//! Error types for core operations.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core air-drawing operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No stroke is currently being drawn.
    #[error("No active stroke")]
    NoActiveStroke,

    /// Stroke not found on the canvas.
    #[error("Stroke not found: {0}")]
    StrokeNotFound(String),

    /// Snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
