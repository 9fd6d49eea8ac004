//! # Airdraw Core
//!
//! Core logic for touchless air drawing: turning streamed hand-landmark
//! frames into gesture modes, freehand strokes, and recognized shapes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                airdraw-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Normalizer      │  Mode Classifier         │
//! │  - 21 joints     │  - Finger pattern table  │
//! │  - Scale ratio   │  - Debounce counter      │
//! ├─────────────────────────────────────────────┤
//! │  Stroke Canvas   │  Shape Recognizer        │
//! │  - Append/erase  │  - Circle / line fits    │
//! │  - Timeout seal  │  - Corner walk           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything here is pure and synchronous. Async session hosting and the
//! interpretation handoff live in `airdraw-session`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod error;
pub mod gesture;
pub mod landmark;
pub mod recognize;

pub use canvas::{CanvasConfig, CanvasSnapshot, Stroke, StrokeCanvas, StrokeId, StrokePoint};
pub use error::{CoreError, CoreResult};
pub use gesture::{ClassifierConfig, GestureMode, ModeClassifier, ModeTransition};
pub use landmark::{
    FingerExtensions, FrameNormalizer, Landmark, LandmarkFrame, NormalizerConfig, INDEX_TIP,
    JOINT_COUNT, MIDDLE_MCP, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP, WRIST,
};
pub use recognize::{
    Point, RecognizedShape, RecognizerConfig, ShapeKind, ShapeParams, ShapeRecognizer,
};

/// Airdraw core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
