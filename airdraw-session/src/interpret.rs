//! Boundary to the external content-interpretation collaborator.
//!
//! The collaborator receives a recognized shape set and returns free-form
//! educational text plus suggestions; both are opaque here and forwarded
//! to the session's caller unmodified. The default adapter speaks JSON
//! over HTTP, but the boundary is a trait so hosts (and tests) can plug
//! in anything.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use airdraw_core::RecognizedShape;

/// Errors from the interpretation collaborator.
#[derive(Debug, Error)]
pub enum InterpretError {
    /// The interpreter base URL provided by configuration is invalid.
    #[error("invalid interpreter URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("interpretation request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The collaborator answered with a non-success status.
    #[error("interpreter returned status {0}")]
    Status(u16),
    /// The response payload did not parse.
    #[error("failed to parse interpretation payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl InterpretError {
    /// Returns true if this error is retryable (transient HTTP failures).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status(code) => *code >= 500,
            _ => false,
        }
    }
}

/// One interpretation request: the shape set plus canvas dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationRequest {
    /// Session the shapes were drawn in.
    pub session_id: String,
    /// Originating canvas width in pixels.
    pub canvas_width: f32,
    /// Originating canvas height in pixels.
    pub canvas_height: f32,
    /// Recognized shapes in stroke insertion order.
    pub shapes: Vec<RecognizedShape>,
}

/// The collaborator's answer, treated as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    /// Free-form educational explanation of the drawn content.
    pub text: String,
    /// Follow-up learning suggestions.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// What the session delivers after an Analyzing trigger.
///
/// The shape list is always present; when the collaborator was
/// unreachable or timed out, `interpretation` is `None` and `error`
/// records why, so a degraded result is still a result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpretationOutcome {
    /// Recognized shapes, in stroke insertion order.
    pub shapes: Vec<RecognizedShape>,
    /// Originating canvas width in pixels.
    pub canvas_width: f32,
    /// Originating canvas height in pixels.
    pub canvas_height: f32,
    /// The collaborator's text, when it arrived.
    pub interpretation: Option<Interpretation>,
    /// Why interpretation is absent, when it is.
    pub error: Option<String>,
}

/// The interpretation collaborator boundary.
#[async_trait]
pub trait ShapeInterpreter: Send + Sync {
    /// Interpret a recognized shape set.
    async fn interpret(
        &self,
        request: InterpretationRequest,
    ) -> Result<Interpretation, InterpretError>;
}

/// Default request timeout for the HTTP adapter.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-over-HTTP adapter to a remote interpretation service.
#[derive(Debug, Clone)]
pub struct HttpInterpreter {
    client: Client,
    endpoint: Url,
}

impl HttpInterpreter {
    /// Create an adapter for the given base URL with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::InvalidUrl`] if the URL does not parse,
    /// or [`InterpretError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, InterpretError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create an adapter with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::InvalidUrl`] if the URL does not parse,
    /// or [`InterpretError::Http`] if the HTTP client cannot be built.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, InterpretError> {
        let base = Url::parse(base_url).map_err(|e| InterpretError::InvalidUrl(e.to_string()))?;
        let endpoint = base
            .join("interpret")
            .map_err(|e| InterpretError::InvalidUrl(e.to_string()))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// The resolved endpoint this adapter posts to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ShapeInterpreter for HttpInterpreter {
    async fn interpret(
        &self,
        request: InterpretationRequest,
    ) -> Result<Interpretation, InterpretError> {
        tracing::debug!(
            session_id = %request.session_id,
            shapes = request.shapes.len(),
            "Dispatching interpretation request"
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InterpretError::Status(status.as_u16()));
        }

        Ok(response.json::<Interpretation>().await?)
    }
}
