//! Feature extraction from probe results.

use crate::error::{FeatureError, Result};
use crate::record::{FeatureRecord, FrameSizeFeatures, SizeStats};
use crate::stats;
use quale_core::{FrameStat, PictureType, ProbeMetadata};
use tracing::debug;

/// Framerate substituted when the container reports unknown.
///
/// A fixed fallback, not an estimate.
pub const FALLBACK_FRAMERATE: f64 = 60.0;

const KIBI: f64 = 1024.0;

/// Extract the coarse feature record from stream metadata alone.
pub fn extract(meta: &ProbeMetadata) -> FeatureRecord {
    FeatureRecord {
        bitrate: meta.bitrate / KIBI,
        framerate: meta.avg_frame_rate.unwrap_or(FALLBACK_FRAMERATE),
        resolution: meta.resolution().pixels(),
        codec: meta.codec.clone(),
        duration: meta.duration,
        frame_sizes: None,
    }
}

/// Extract the refined feature record, including frame-size statistics.
///
/// Fails fast when the sample set is empty or one picture-type population
/// is missing; NaN statistics are never emitted.
pub fn extract_with_frames(meta: &ProbeMetadata, frames: &[FrameStat]) -> Result<FeatureRecord> {
    let mut record = extract(meta);
    record.frame_sizes = Some(frame_size_features(frames)?);
    Ok(record)
}

fn frame_size_features(frames: &[FrameStat]) -> Result<FrameSizeFeatures> {
    if frames.is_empty() {
        return Err(FeatureError::EmptyFrameSamples);
    }

    let iframe_sizes: Vec<f64> = frames
        .iter()
        .filter(|f| f.picture_type == PictureType::I)
        .map(|f| f.size as f64)
        .collect();
    let noniframe_sizes: Vec<f64> = frames
        .iter()
        .filter(|f| f.picture_type == PictureType::NonI)
        .map(|f| f.size as f64)
        .collect();

    if iframe_sizes.is_empty() {
        return Err(FeatureError::MissingPopulation("I"));
    }
    if noniframe_sizes.is_empty() {
        return Err(FeatureError::MissingPopulation("non-I"));
    }

    let max_size = frames.iter().map(|f| f.size).max().unwrap_or(0) as f64;
    if max_size == 0.0 {
        return Err(FeatureError::DegenerateSizes);
    }

    debug!(
        "frame-size features over {} I / {} non-I frames",
        iframe_sizes.len(),
        noniframe_sizes.len()
    );

    let iframe = size_stats(&iframe_sizes);
    let noniframe = size_stats(&noniframe_sizes);

    let normalized: Vec<f64> = frames.iter().map(|f| f.size as f64 / max_size).collect();

    Ok(FrameSizeFeatures {
        mean_share: iframe.mean / (iframe.mean + noniframe.mean),
        median_share: iframe.median / (iframe.median + noniframe.median),
        std_share: iframe.std_dev / (iframe.std_dev + noniframe.std_dev),
        mean_ratio: iframe.mean / noniframe.mean,
        median_ratio: iframe.median / noniframe.median,
        std_ratio: iframe.std_dev / noniframe.std_dev,
        norm_mean_all: stats::mean(&normalized),
        norm_std_all: stats::std_dev(&normalized),
        iframe,
        noniframe,
    })
}

fn size_stats(sizes: &[f64]) -> SizeStats {
    SizeStats {
        mean: stats::mean(sizes),
        median: stats::median(sizes),
        std_dev: stats::std_dev(sizes),
        kurtosis: stats::kurtosis(sizes),
        iqr: stats::iqr(sizes),
        percentiles: stats::decile_percentiles(sizes),
    }
}
