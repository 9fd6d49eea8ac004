//! Replays a synthetic gesture stream through a session and prints what
//! the engine makes of it.
//!
//! Run with `cargo run --example replay`. Set `RUST_LOG=debug` to watch
//! the per-frame pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use airdraw_core::{Landmark, LandmarkFrame, JOINT_COUNT, MIDDLE_MCP};
use airdraw_session::{
    InterpretError, Interpretation, InterpretationRequest, SessionManager, ShapeInterpreter,
};

/// Canned stand-in for the remote interpretation service.
struct CannedInterpreter;

#[async_trait]
impl ShapeInterpreter for CannedInterpreter {
    async fn interpret(
        &self,
        request: InterpretationRequest,
    ) -> Result<Interpretation, InterpretError> {
        let kinds: Vec<String> = request.shapes.iter().map(|s| s.kind.to_string()).collect();
        Ok(Interpretation {
            text: format!("You drew: {}", kinds.join(", ")),
            suggestions: vec!["try a triangle next".to_string()],
        })
    }
}

const TIPS: [usize; 5] = [4, 8, 12, 16, 20];

/// Synthesize a frame with the given fingers extended, hand anchored at
/// `origin`.
fn hand_frame(ext: [bool; 5], origin: (f32, f32), t: u64) -> LandmarkFrame {
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

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let manager = SessionManager::new(Arc::new(CannedInterpreter));
    let mut started = manager.start_session("replay")?;
    let mut t = 0;
    let mut tick = || {
        t += 33;
        t
    };

    // Trace a circle with the drawing gesture.
    let drawing = [true, true, false, false, false];
    for _ in 0..3 {
        manager.submit_frame("replay", &hand_frame(drawing, (580.0, 275.0), tick()))?;
    }
    for i in 1..=48 {
        let theta = i as f32 * std::f32::consts::TAU / 48.0;
        let origin = (
            480.0 + 100.0 * theta.cos(),
            275.0 + 100.0 * theta.sin(),
        );
        manager.submit_frame("replay", &hand_frame(drawing, origin, tick()))?;
    }

    // Lift to idle, then flash the analyze gesture.
    let fist = [false, false, false, false, false];
    for _ in 0..3 {
        manager.submit_frame("replay", &hand_frame(fist, (480.0, 275.0), tick()))?;
    }
    let analyzing = [false, true, true, false, false];
    let mut report = None;
    for _ in 0..3 {
        report = Some(manager.submit_frame("replay", &hand_frame(analyzing, (480.0, 275.0), tick()))?);
    }

    if let Some(report) = report {
        println!("mode: {}", report.mode);
        println!("canvas: {}", report.snapshot.to_json()?);
    }

    if let Some(outcome) = started.outcomes.recv().await {
        for shape in &outcome.shapes {
            println!(
                "recognized {} (confidence {:.2})",
                shape.kind, shape.confidence
            );
        }
        match outcome.interpretation {
            Some(interpretation) => println!("interpretation: {}", interpretation.text),
            None => println!(
                "interpretation unavailable: {}",
                outcome.error.unwrap_or_default()
            ),
        }
    }

    manager.stop_session("replay")?;
    Ok(())
}
