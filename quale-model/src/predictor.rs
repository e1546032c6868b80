//! Sequence-level prediction: wiring of the four model stages.

use crate::aggregate::{aggregate, DegradationTriple, ReportingScale};
use crate::coefficients::{spatio_temporal, ModelCoefficients};
use crate::degradation::{temporal_degradation, upscaling_degradation, weighted_coding_degradation};
use crate::quantization::{estimate_quantization, ModelVariant};
use crate::sampler::per_second_scores;
use quale_core::{DeviceClass, DeviceType, Error, FrameStat, ProbeMetadata, Resolution};
use quale_features::{extract, extract_with_frames, FeatureCache, FeatureRecord};
use quale_probe::MediaProbe;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Viewing distance relative to display height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewingDistance {
    /// 1.5 × display height.
    #[default]
    H1_5,
    /// 4 × display height.
    H4,
    /// 6 × display height.
    H6,
}

impl ViewingDistance {
    /// Parse the conventional `NxH` notation.
    pub fn parse(s: &str) -> quale_core::Result<Self> {
        match s {
            "1.5xH" => Ok(ViewingDistance::H1_5),
            "4xH" => Ok(ViewingDistance::H4),
            "6xH" => Ok(ViewingDistance::H6),
            other => Err(Error::invalid_input(format!(
                "unsupported viewing distance '{other}', expected 1.5xH, 4xH or 6xH"
            ))),
        }
    }
}

impl std::fmt::Display for ViewingDistance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ViewingDistance::H1_5 => "1.5xH",
            ViewingDistance::H4 => "4xH",
            ViewingDistance::H6 => "6xH",
        };
        f.write_str(s)
    }
}

/// Playout conditions: device, display resolution, viewing geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub device_type: DeviceType,
    /// Display resolution in pixels.
    pub display: Resolution,
    /// Viewing distance; recorded in reports, not used numerically.
    pub viewing_distance: ViewingDistance,
    /// Display diagonal in inches; recorded in reports.
    pub display_size: f64,
}

impl DeviceProfile {
    /// Profile with the default viewing geometry (1.5×H, 55 in).
    pub fn new(device_type: DeviceType, display: Resolution) -> Self {
        Self {
            device_type,
            display,
            viewing_distance: ViewingDistance::default(),
            display_size: 55.0,
        }
    }

    pub fn with_viewing_distance(mut self, distance: ViewingDistance) -> Self {
        self.viewing_distance = distance;
        self
    }

    pub fn with_display_size(mut self, inches: f64) -> Self {
        self.display_size = inches;
        self
    }

    /// Coefficient class of the device.
    pub fn class(&self) -> DeviceClass {
        self.device_type.class()
    }

    /// Reject malformed display parameters before any math runs.
    pub fn validate(&self) -> quale_core::Result<()> {
        if self.display.pixels() == 0 {
            return Err(Error::invalid_input("display resolution must be non-zero"));
        }
        if !(10.0..=75.0).contains(&self.display_size) {
            return Err(Error::invalid_input(format!(
                "display size {} in is outside the supported 10-75 in range",
                self.display_size
            )));
        }
        Ok(())
    }
}

/// Final output of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Sequence-level opinion score in [1, 5].
    pub per_sequence: f64,
    /// One score per playback second, same scale.
    pub per_second: Vec<f64>,
    /// Degradation breakdown for diagnostics.
    pub debug: DegradationTriple,
}

/// The sequence predictor: features → quantization → degradations →
/// aggregate → per-second expansion.
#[derive(Debug, Clone)]
pub struct Predictor {
    variant: ModelVariant,
    device: DeviceProfile,
    coefficients: ModelCoefficients,
    reporting: ReportingScale,
}

impl Predictor {
    pub fn new(
        variant: ModelVariant,
        device: DeviceProfile,
        coefficients: ModelCoefficients,
    ) -> Self {
        Self {
            variant,
            device,
            coefficients,
            reporting: ReportingScale::default(),
        }
    }

    /// Select the reporting granularity (5-point by default).
    pub fn with_reporting(mut self, reporting: ReportingScale) -> Self {
        self.reporting = reporting;
        self
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    /// Predict from probe results, extracting features as needed.
    ///
    /// Validates inputs up front: an unsupported codec or malformed
    /// device parameters abort the prediction rather than producing a
    /// default score.
    pub fn predict(
        &self,
        meta: &ProbeMetadata,
        frames: Option<&[FrameStat]>,
    ) -> quale_core::Result<PredictionResult> {
        self.device.validate()?;
        if !meta.codec.is_supported() {
            return Err(Error::invalid_input(format!(
                "video codec '{}' is not supported by the model",
                meta.codec
            )));
        }

        let record = match self.variant {
            ModelVariant::Coarse => extract(meta),
            ModelVariant::Refined => {
                let frames = frames.ok_or_else(|| {
                    Error::invalid_input("the refined variant requires frame-size samples")
                })?;
                extract_with_frames(meta, frames)?
            }
        };

        Ok(self.predict_record(&record)?)
    }

    /// Predict quality of a video file: probe, extract features (through
    /// the cache when one is given), evaluate.
    ///
    /// The codec check runs right after the metadata probe so an
    /// unsupported input fails before any frame-level extraction cost.
    pub fn predict_file(
        &self,
        video: &Path,
        probe: &dyn MediaProbe,
        cache: Option<&FeatureCache>,
    ) -> quale_core::Result<PredictionResult> {
        self.device.validate()?;
        let meta = probe.probe(video)?;
        if !meta.codec.is_supported() {
            return Err(Error::invalid_input(format!(
                "video codec '{}' is not supported by the model",
                meta.codec
            )));
        }

        let compute = || -> quale_core::Result<FeatureRecord> {
            match self.variant {
                ModelVariant::Coarse => Ok(extract(&meta)),
                ModelVariant::Refined => {
                    let frames = probe.frame_stats(video)?;
                    Ok(extract_with_frames(&meta, &frames)?)
                }
            }
        };

        let record = match cache {
            Some(cache) => cache.get_or_compute(video, compute)?,
            None => compute()?,
        };

        Ok(self.predict_record(&record)?)
    }

    /// Predict from an already-extracted feature record.
    ///
    /// A record with an out-of-table codec flows through on the sentinel
    /// path: zero one-hot weight, zero coding degradation, a defined but
    /// degenerate score.
    pub fn predict_record(&self, record: &FeatureRecord) -> crate::error::Result<PredictionResult> {
        let class = self.device.class();
        let st = spatio_temporal(class);

        let quant = estimate_quantization(self.variant, class, record)?;

        let coding =
            weighted_coding_degradation(&record.codec, quant.quant, class, &self.coefficients)?;
        let upscaling = upscaling_degradation(
            record.resolution as f64,
            self.device.display.pixels() as f64,
            &st,
        );
        let temporal = temporal_degradation(record.framerate, &st);

        let debug = DegradationTriple {
            coding,
            upscaling,
            temporal,
        };
        let per_sequence = aggregate(&debug, self.reporting);
        let per_second = per_second_scores(per_sequence, record.duration);

        debug!(
            "degradations: coding={coding:.3} upscaling={upscaling:.3} temporal={temporal:.3}"
        );
        info!(
            "predicted {per_sequence:.3} over {} seconds ({} variant, {} device)",
            per_second.len(),
            self.variant,
            self.device.device_type,
        );

        Ok(PredictionResult {
            per_sequence,
            per_second,
            debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quale_core::VideoCodec;

    fn profile() -> DeviceProfile {
        DeviceProfile::new(DeviceType::Pc, Resolution::new(3840, 2160))
    }

    fn metadata(codec: VideoCodec) -> ProbeMetadata {
        ProbeMetadata {
            bitrate: 5_120_000.0,
            avg_frame_rate: Some(30.0),
            width: 3840,
            height: 2160,
            codec,
            duration: 10.0,
        }
    }

    #[test]
    fn test_device_profile_validation() {
        assert!(profile().validate().is_ok());

        let oversized = profile().with_display_size(300.0);
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_viewing_distance_parse() {
        assert_eq!(ViewingDistance::parse("1.5xH").unwrap(), ViewingDistance::H1_5);
        assert_eq!(ViewingDistance::parse("4xH").unwrap(), ViewingDistance::H4);
        assert!(ViewingDistance::parse("2xH").is_err());
    }

    #[test]
    fn test_unsupported_codec_aborts_prediction() {
        let predictor = Predictor::new(
            ModelVariant::Coarse,
            profile(),
            ModelCoefficients::builtin(),
        );
        let err = predictor
            .predict(&metadata(VideoCodec::Other("av1".into())), None)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_refined_without_frames_aborts() {
        let predictor = Predictor::new(
            ModelVariant::Refined,
            profile(),
            ModelCoefficients::builtin(),
        );
        let err = predictor.predict(&metadata(VideoCodec::H264), None).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_sentinel_record_yields_degenerate_result() {
        let predictor = Predictor::new(
            ModelVariant::Coarse,
            profile(),
            ModelCoefficients::builtin(),
        );
        let record = FeatureRecord {
            bitrate: 5000.0,
            framerate: 30.0,
            resolution: 8_294_400,
            codec: VideoCodec::Other("av1".into()),
            duration: 10.0,
            frame_sizes: None,
        };
        let result = predictor.predict_record(&record).unwrap();
        // Zero coding weight, defined output, nothing NaN.
        assert_eq!(result.debug.coding, 0.0);
        assert!(result.per_sequence.is_finite());
        assert!((1.0..=5.0).contains(&result.per_sequence));
        assert!(result.per_second.iter().all(|s| s.is_finite()));
    }
}
