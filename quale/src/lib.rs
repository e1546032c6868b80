//! # quale
//!
//! No-reference video quality estimation from compressed-domain
//! statistics. quale predicts a MOS-like opinion score (1–5) per encoded
//! video and per second of playback without ever decoding pixels or
//! touching the uncompressed source.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quale::{predict_quality, PredictOptions};
//!
//! fn main() -> quale::Result<()> {
//!     let report = predict_quality("clip.mp4".as_ref(), &PredictOptions::default())?;
//!     println!("{:.2}", report.per_sequence);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several crates:
//! - `quale-core`: shared types and errors
//! - `quale-probe`: ffprobe metadata and frame-size extraction
//! - `quale-features`: feature records, statistics and the feature cache
//! - `quale-model`: the parametric quality model
//! - `quale-hybrid`: transcode-and-repredict mode
//!
//! This crate re-exports the most commonly used types and provides a
//! high-level API for simple use cases.

mod options;
mod report;

// Re-export core types
pub use quale_core::{
    DeviceClass, DeviceType, Error, FrameStat, PictureType, ProbeMetadata, Resolution, Result,
    VideoCodec,
};

// Re-export probing
pub use quale_probe::{FfprobeProber, MediaProbe};

// Re-export features
pub use quale_features::{FeatureCache, FeatureRecord, FrameSizeFeatures, SizeStats};

// Re-export the model
pub use quale_model::{
    DegradationTriple, DeviceProfile, ModelCoefficients, ModelVariant, PredictionResult,
    Predictor, ReportingScale, ViewingDistance,
};

// Re-export hybrid mode
pub use quale_hybrid::{
    EncodeSettings, FfmpegEncoder, HybridOptions, HybridPredictor, HybridStrategy, VideoEncoder,
};

// High-level API
pub use options::PredictOptions;
pub use report::{DebugBreakdown, Report};

use std::path::Path;

/// Predict the quality of one video file with the plain (bitstream)
/// pipeline.
pub fn predict_quality(video: &Path, options: &PredictOptions) -> Result<Report> {
    let prober = FfprobeProber::new();
    let cache = options.open_cache()?;
    let predictor = options.predictor();

    let result = predictor.predict_file(video, &prober, cache.as_ref())?;
    Ok(Report::new(video, &result, options.model_name()))
}

/// Predict the quality of one video file through the hybrid
/// (transcode-and-repredict) round trip.
pub fn predict_quality_hybrid(
    video: &Path,
    options: &PredictOptions,
    hybrid: HybridOptions,
) -> Result<Report> {
    let prober = FfprobeProber::new();
    let cache = options.open_cache()?;
    let model_name = format!("hybrid-{}", options.model_name());

    let predictor = HybridPredictor::new(FfmpegEncoder::new(), options.predictor(), hybrid);
    let result = predictor.predict_file(video, &prober, cache.as_ref())?;
    Ok(Report::new(video, &result, model_name))
}
