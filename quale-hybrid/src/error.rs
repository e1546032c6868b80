//! Hybrid-mode error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the hybrid re-encoding round trip.
#[derive(Debug, Error)]
pub enum HybridError {
    /// Source video does not exist.
    #[error("Source video not found: {0}")]
    SourceNotFound(PathBuf),

    /// No encoder exists for the requested target codec.
    #[error("No encoder available for codec '{0}'")]
    NoEncoder(String),

    /// The same-codec strategy needs the source codec to be declared.
    #[error("The same-codec strategy requires a source codec")]
    MissingSourceCodec,

    /// I/O failure launching ffmpeg or managing artifacts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ffmpeg exited with a non-zero status.
    #[error("ffmpeg failed for {path}: {stderr}")]
    EncodeFailed { path: PathBuf, stderr: String },

    /// ffmpeg exited cleanly but produced no output file.
    #[error("Encoder produced no output at {0}")]
    MissingOutput(PathBuf),
}

impl From<HybridError> for quale_core::Error {
    fn from(e: HybridError) -> Self {
        match e {
            HybridError::MissingSourceCodec => quale_core::Error::InvalidInput(e.to_string()),
            other => quale_core::Error::Encode(other.to_string()),
        }
    }
}

/// Result type for hybrid operations.
pub type Result<T> = std::result::Result<T, HybridError>;
