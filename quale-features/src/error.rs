//! Feature extraction error types.

use thiserror::Error;

/// Errors from feature extraction and caching.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// The prober returned zero frame records; every frame-size statistic
    /// would be undefined, so extraction refuses to continue.
    #[error("No frame-size samples: the prober produced zero frames")]
    EmptyFrameSamples,

    /// One of the two frame populations is empty (e.g. an all-intra
    /// stream has no non-I frames), so the ratio features are undefined.
    #[error("No {0} frames in the sample set; ratio features are undefined")]
    MissingPopulation(&'static str),

    /// All packet sizes are zero; normalized statistics are undefined.
    #[error("Degenerate frame sizes: every packet size is zero")]
    DegenerateSizes,

    /// Cache I/O failure.
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache payload (de)serialization failure.
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<FeatureError> for quale_core::Error {
    fn from(e: FeatureError) -> Self {
        match e {
            FeatureError::EmptyFrameSamples
            | FeatureError::MissingPopulation(_)
            | FeatureError::DegenerateSizes => quale_core::Error::InvalidInput(e.to_string()),
            other => quale_core::Error::Feature(other.to_string()),
        }
    }
}

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;
