//! Per-video feature records.

use quale_core::VideoCodec;
use serde::{Deserialize, Serialize};

/// Flat feature record for one video.
///
/// Built once per (video, variant) pair and optionally persisted to the
/// feature cache. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Average bitrate in kbit/s (probed bits/sec ÷ 1024).
    pub bitrate: f64,
    /// Framerate in fps, with the fixed 60.0 fallback for unknown.
    pub framerate: f64,
    /// Resolution in pixels (width × height).
    pub resolution: u64,
    pub codec: VideoCodec,
    /// Duration in seconds.
    pub duration: f64,
    /// Frame-size statistics; present only for the refined variant.
    pub frame_sizes: Option<FrameSizeFeatures>,
}

/// Descriptive statistics of one frame population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// Excess kurtosis, Fisher definition.
    pub kurtosis: f64,
    pub iqr: f64,
    /// 0th, 10th, … 100th percentiles.
    pub percentiles: [f64; 11],
}

/// Frame-size features split by picture type, plus cross statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSizeFeatures {
    pub iframe: SizeStats,
    pub noniframe: SizeStats,
    /// I-frame mean size share: `mean_i / (mean_i + mean_noni)`.
    pub mean_share: f64,
    /// Same share by median.
    pub median_share: f64,
    /// Same share by standard deviation.
    pub std_share: f64,
    /// Direct ratio `mean_i / mean_noni`.
    pub mean_ratio: f64,
    /// Direct ratio by median.
    pub median_ratio: f64,
    /// Direct ratio by standard deviation.
    pub std_ratio: f64,
    /// Mean of all sizes normalized by the global maximum size.
    pub norm_mean_all: f64,
    /// Standard deviation of all sizes normalized by the global maximum.
    pub norm_std_all: f64,
}
