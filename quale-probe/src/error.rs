//! Probe error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the ffprobe collaborators.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Input file does not exist.
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),

    /// ffprobe could not be launched (typically not installed).
    #[error("Failed to launch ffprobe: {0}")]
    Launch(#[from] std::io::Error),

    /// ffprobe exited with a non-zero status.
    #[error("ffprobe failed for {path}: {stderr}")]
    Failed { path: PathBuf, stderr: String },

    /// ffprobe output was not valid JSON.
    #[error("Invalid ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),

    /// The file carries no video stream.
    #[error("No video stream in {0}")]
    MissingVideoStream(PathBuf),

    /// A required metadata field is absent or unparsable.
    #[error("Missing or invalid field '{field}' for {path}")]
    InvalidField { path: PathBuf, field: &'static str },
}

impl From<ProbeError> for quale_core::Error {
    fn from(e: ProbeError) -> Self {
        quale_core::Error::Probe(e.to_string())
    }
}

/// Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
