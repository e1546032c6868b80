//! Caller-facing prediction reports.

use quale_model::PredictionResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Degradation breakdown exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugBreakdown {
    pub coding_deg: f64,
    pub upscaling_deg: f64,
    pub temporal_deg: f64,
}

/// One video's prediction report, as serialized for reporting layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub video_full_path: String,
    pub video_basename: String,
    pub per_second: Vec<f64>,
    pub per_sequence: f64,
    pub debug: DebugBreakdown,
    /// Report creation time, RFC 3339.
    pub date: String,
    /// Model that produced the scores (`coarse`, `refined`, `hybrid-…`).
    pub model: String,
    pub version: String,
}

impl Report {
    /// Wrap a prediction result for one video.
    pub fn new(video: &Path, result: &PredictionResult, model: impl Into<String>) -> Self {
        Self {
            video_full_path: video.display().to_string(),
            video_basename: video
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            per_second: result.per_second.clone(),
            per_sequence: result.per_sequence,
            debug: DebugBreakdown {
                coding_deg: result.debug.coding,
                upscaling_deg: result.debug.upscaling,
                temporal_deg: result.debug.temporal,
            },
            date: chrono::Local::now().to_rfc3339(),
            model: model.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
