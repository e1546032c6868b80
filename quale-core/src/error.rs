//! Error types for the quale library.
//!
//! Each crate defines its own error enum; this module provides the
//! top-level `Error` that wraps them for callers working at the
//! whole-pipeline level.

use thiserror::Error;

/// Main error type for the quale library.
#[derive(Error, Debug)]
pub enum Error {
    /// Probing the input video failed (ffprobe error, missing stream).
    #[error("Probe error: {0}")]
    Probe(String),

    /// Feature extraction failed.
    #[error("Feature error: {0}")]
    Feature(String),

    /// Model evaluation failed.
    #[error("Model error: {0}")]
    Model(String),

    /// Hybrid re-encoding failed.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Caller-supplied input is invalid (unsupported codec, malformed
    /// device parameters, empty frame samples).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required model coefficient is missing from the configuration.
    #[error("Missing coefficient '{name}' for device class '{device_class}'")]
    MissingCoefficient {
        device_class: &'static str,
        name: String,
    },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration document could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Whether this error indicates a caller mistake rather than an
    /// environment or collaborator failure.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

/// Result type alias using the top-level error.
pub type Result<T> = std::result::Result<T, Error>;
