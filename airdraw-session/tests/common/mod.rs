//! Shared helpers for session integration tests: synthetic hand frames
//! and interpreter doubles.

use std::time::Duration;

use async_trait::async_trait;

use airdraw_core::{Landmark, LandmarkFrame, JOINT_COUNT, MIDDLE_MCP};
use airdraw_session::{
    InterpretError, Interpretation, InterpretationRequest, ShapeInterpreter,
};

/// Fingertip joint indices, thumb to pinky.
const TIPS: [usize; 5] = [4, 8, 12, 16, 20];

/// Build a frame with the given fingers extended.
///
/// The hand hangs below `origin`: the wrist sits 180 px under it and the
/// middle-finger base 100 px above the wrist, so the hand-scale reference
/// is 100 and extended tips (180 px from the wrist) clear the detection
/// ratio. An extended middle fingertip lands exactly on `origin`; the
/// other tips fan out at fixed angles, so moving `origin` between frames
/// translates the whole hand rigidly.
pub fn hand_frame(ext: [bool; 5], origin: (f32, f32), t: u64) -> LandmarkFrame {
    let wrist = (origin.0, origin.1 + 180.0);
    let mut joints = [Landmark::new(wrist.0, wrist.1, 0.9); JOINT_COUNT];
    joints[MIDDLE_MCP] = Landmark::new(wrist.0, wrist.1 - 100.0, 0.9);
    let angles = [-0.5_f32, -0.25, 0.0, 0.25, 0.5];
    for (i, &tip) in TIPS.iter().enumerate() {
        let dist = if ext[i] { 180.0 } else { 80.0 };
        joints[tip] = Landmark::new(
            wrist.0 + angles[i].sin() * dist,
            wrist.1 - angles[i].cos() * dist,
            0.9,
        );
    }
    LandmarkFrame::new(joints, t)
}

/// Thumb + index: Drawing.
pub fn drawing_frame(origin: (f32, f32), t: u64) -> LandmarkFrame {
    hand_frame([true, true, false, false, false], origin, t)
}

/// Thumb + middle: Erasing. The erase cursor is exactly `origin`.
pub fn erasing_frame(origin: (f32, f32), t: u64) -> LandmarkFrame {
    hand_frame([true, false, true, false, false], origin, t)
}

/// Thumb + pinky: Clearing.
pub fn clearing_frame(t: u64) -> LandmarkFrame {
    hand_frame([true, false, false, false, true], (400.0, 200.0), t)
}

/// Index + middle, thumb retracted: Analyzing.
pub fn analyzing_frame(t: u64) -> LandmarkFrame {
    hand_frame([false, true, true, false, false], (400.0, 200.0), t)
}

/// Closed fist: Idle.
pub fn idle_frame(t: u64) -> LandmarkFrame {
    hand_frame([false, false, false, false, false], (400.0, 200.0), t)
}

/// Interpreter double that answers immediately.
pub struct StaticInterpreter;

#[async_trait]
impl ShapeInterpreter for StaticInterpreter {
    async fn interpret(
        &self,
        request: InterpretationRequest,
    ) -> Result<Interpretation, InterpretError> {
        Ok(Interpretation {
            text: format!("saw {} shapes", request.shapes.len()),
            suggestions: vec!["keep sketching".to_string()],
        })
    }
}

/// Interpreter double that never answers within a test's patience.
pub struct SlowInterpreter;

#[async_trait]
impl ShapeInterpreter for SlowInterpreter {
    async fn interpret(
        &self,
        request: InterpretationRequest,
    ) -> Result<Interpretation, InterpretError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Interpretation {
            text: format!("late answer for {} shapes", request.shapes.len()),
            suggestions: Vec::new(),
        })
    }
}

/// Interpreter double standing in for an unreachable collaborator.
pub struct UnavailableInterpreter;

#[async_trait]
impl ShapeInterpreter for UnavailableInterpreter {
    async fn interpret(
        &self,
        _request: InterpretationRequest,
    ) -> Result<Interpretation, InterpretError> {
        Err(InterpretError::Status(503))
    }
}
