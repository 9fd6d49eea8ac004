//! # Airdraw Session
//!
//! Session hosting for the air-drawing engine. Drives the per-frame
//! pipeline from `airdraw-core` (normalize → classify → canvas action),
//! owns the canvas lifecycle, and hands recognized shape sets to the
//! external interpretation collaborator without blocking frame
//! processing.
//!
//! Frame processing is synchronous and single-threaded per session; the
//! interpretation handoff is the only suspending operation and runs in a
//! single cancellable task slot with last-request-wins semantics.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod interpret;
pub mod manager;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use interpret::{
    HttpInterpreter, InterpretError, Interpretation, InterpretationOutcome, InterpretationRequest,
    ShapeInterpreter,
};
pub use manager::{SessionManager, StartedSession};
pub use session::{FrameReport, Session, SessionConfig, SessionPhase};

/// Airdraw session version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
