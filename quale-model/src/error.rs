//! Model error types.

use thiserror::Error;

/// Errors from model evaluation and configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The configuration document lacks a required coefficient. There is
    /// no principled fallback, so this is fatal.
    #[error("Missing coefficient '{name}' for device class '{device_class}'")]
    MissingCoefficient {
        device_class: &'static str,
        name: String,
    },

    /// The refined variant needs frame-size features the record lacks.
    #[error("Feature record has no frame-size statistics (required by the refined variant)")]
    MissingFrameFeatures,

    /// Configuration document could not be read.
    #[error("Model configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration document is not valid JSON.
    #[error("Model configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<ModelError> for quale_core::Error {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::MissingCoefficient { device_class, name } => {
                quale_core::Error::MissingCoefficient { device_class, name }
            }
            other => quale_core::Error::Model(other.to_string()),
        }
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
