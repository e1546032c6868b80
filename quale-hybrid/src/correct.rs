//! Affine score correction for the transcoding round trip.

use quale_core::VideoCodec;
use quale_model::PredictionResult;
use tracing::warn;

/// Per-source-codec affine correction `corrected = slope·score + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineCorrection {
    pub slope: f64,
    pub intercept: f64,
}

impl AffineCorrection {
    pub fn apply(&self, score: f64) -> f64 {
        self.slope * score + self.intercept
    }
}

/// Correction coefficients, defined for h264 and vp9 sources only.
///
/// hevc and out-of-table codecs intentionally receive no correction; the
/// asymmetry is part of the reference model, not a gap to paper over.
pub fn correction_for(source_codec: &VideoCodec) -> Option<AffineCorrection> {
    match source_codec {
        VideoCodec::H264 => Some(AffineCorrection {
            slope: 0.90534066,
            intercept: 0.09309030,
        }),
        VideoCodec::Vp9 => Some(AffineCorrection {
            slope: 0.85302496,
            intercept: 0.69794354,
        }),
        VideoCodec::Hevc | VideoCodec::Other(_) => None,
    }
}

/// Rescale the per-second series so it tracks a corrected sequence score
/// while keeping its temporal shape:
/// `per_second[i]' = per_second[i] / uncorrected · corrected`.
pub fn rescale_per_second(per_second: &[f64], uncorrected: f64, corrected: f64) -> Vec<f64> {
    per_second
        .iter()
        .map(|s| s / uncorrected * corrected)
        .collect()
}

/// Apply the source-codec correction to a completed prediction.
///
/// Uncorrectable codecs pass through unchanged.
pub fn correct(result: &PredictionResult, source_codec: &VideoCodec) -> PredictionResult {
    let Some(correction) = correction_for(source_codec) else {
        warn!(
            "no score correction defined for source codec '{source_codec}'; \
             scores pass through uncorrected"
        );
        return result.clone();
    };

    let corrected = correction.apply(result.per_sequence);
    PredictionResult {
        per_sequence: corrected,
        per_second: rescale_per_second(&result.per_second, result.per_sequence, corrected),
        debug: result.debug,
    }
}
