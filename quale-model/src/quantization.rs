//! Quantization-level estimation from compressed-domain features.

use crate::coefficients::{coarse_qp, refined_qp};
use crate::error::{ModelError, Result};
use quale_core::DeviceClass;
use quale_features::FeatureRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentinel for codecs the regression does not support. Rows carrying it
/// are excluded from degradation weighting downstream.
pub const UNSUPPORTED_SENTINEL: f64 = -1.0;

/// Which regression the estimator evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Stream metadata only (bitrate, resolution, framerate).
    Coarse,
    /// Adds per-frame size statistics (I / non-I populations).
    Refined,
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelVariant::Coarse => f.write_str("coarse"),
            ModelVariant::Refined => f.write_str("refined"),
        }
    }
}

/// Output of the quantization estimator for one video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizationEstimate {
    /// Raw predicted QP; −1 for unsupported codecs.
    pub pred_qp: f64,
    /// QP normalized by the codec's native range; −1 for unsupported.
    pub quant: f64,
}

impl QuantizationEstimate {
    /// Whether this row carries the unsupported-codec sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.quant == UNSUPPORTED_SENTINEL
    }
}

/// Estimate the normalized quantization level of one video.
///
/// Unsupported codecs yield the −1 sentinel rather than an error: the row
/// stays in the batch but contributes zero degradation weight.
pub fn estimate_quantization(
    variant: ModelVariant,
    class: DeviceClass,
    record: &FeatureRecord,
) -> Result<QuantizationEstimate> {
    let resolution = record.resolution as f64;

    let pred_qp = match variant {
        ModelVariant::Coarse => match coarse_qp(class, &record.codec) {
            Some(c) => {
                c.a + c.b * record.bitrate.ln()
                    + c.c * resolution.ln()
                    + c.d * record.framerate.ln()
            }
            None => {
                return Ok(QuantizationEstimate {
                    pred_qp: UNSUPPORTED_SENTINEL,
                    quant: UNSUPPORTED_SENTINEL,
                })
            }
        },
        ModelVariant::Refined => {
            let frame_sizes = record
                .frame_sizes
                .as_ref()
                .ok_or(ModelError::MissingFrameFeatures)?;
            match refined_qp(class, &record.codec) {
                Some(c) => {
                    c.a + c.b * frame_sizes.noniframe.mean.ln()
                        + c.c * resolution.ln()
                        + c.d * record.framerate.ln()
                        + c.e * frame_sizes.mean_ratio.ln()
                }
                None => {
                    return Ok(QuantizationEstimate {
                        pred_qp: UNSUPPORTED_SENTINEL,
                        quant: UNSUPPORTED_SENTINEL,
                    })
                }
            }
        }
    };

    // Normalization is defined exactly for the codecs the tables cover.
    let quant = match record.codec.qp_range() {
        Some(range) => pred_qp / range,
        None => UNSUPPORTED_SENTINEL,
    };

    debug!(
        "quantization estimate ({variant}, {:?}): pred_qp={pred_qp:.4} quant={quant:.4}",
        record.codec
    );

    Ok(QuantizationEstimate { pred_qp, quant })
}
