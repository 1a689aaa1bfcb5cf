//! Gesture-driven sketching.
//!
//! A stream of hand-landmark detections is classified into discrete hand
//! gestures, which drive a drawing state machine over a persistent ink
//! surface with snapshot-based undo/redo and on-demand shape recognition.
//!
//! Pipeline per frame: [`frame_loop::FrameLoop`] → [`LandmarkEstimator`] →
//! [`gesture::classify`] → [`engine::DrawingEngine`].
//!
//! [`LandmarkEstimator`]: frame_loop::LandmarkEstimator

pub mod config;
pub mod engine;
pub mod error;
pub mod frame_loop;
pub mod gesture;
pub mod history;
pub mod landmarks;
pub mod pointer;
pub mod rng;
pub mod shape;
pub mod stroke;
pub mod surface;
pub mod types;

pub use config::EngineConfig;
pub use engine::{DrawingEngine, EngineStatus, ToolMode};
pub use error::{Error, Result};
pub use frame_loop::{CycleOutcome, FrameLoop, FrameSource, LandmarkEstimator, StopHandle};
pub use gesture::Gesture;
pub use landmarks::{Finger, HandLandmarks, Landmark};
pub use shape::{GeometricClassifier, Recognition, Shape, ShapeClassifier};
pub use types::{Color, FrameBuffer, Point};

/// Initialize logging
///
/// Console output, `info` by default, overridable through `RUST_LOG`.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
