// One error type for the whole crate.
// Every variant states *where* things went wrong: window, camera, sensor data,
// history blobs or config.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed

    /// A detected hand is missing a finger group (or the group has no joints).
    #[error("Malformed landmarks: finger '{0}' is missing or empty")]
    MalformedLandmarks(&'static str),
    /// The external landmark estimator rejected the call.
    #[error("Landmark estimator failed: {0}")]
    Estimator(String),
    /// The external shape classifier rejected the call.
    #[error("Shape classifier failed: {0}")]
    ShapeClassifier(String),
    /// A history blob could not be restored onto the surface.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
    #[error("Invalid config: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
