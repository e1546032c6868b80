//! Parametric no-reference video quality model.
//!
//! Predicts a MOS-like opinion score (1–5) from compressed-domain
//! features through four stages:
//!
//! 1. a per-codec log-linear regression estimating the normalized
//!    quantization level,
//! 2. an exponential MOS-shaped coding-degradation curve, blended across
//!    codecs by one-hot weighting,
//! 3. two independent logarithmic degradation terms for upscaling and
//!    framerate, parameterized by device class,
//! 4. aggregation on the 0–100 impairment scale and conversion back to
//!    the opinion scale, with a per-second expansion of the result.
//!
//! All regression coefficients are fixed constants selected by codec and
//! device class; nothing here trains or fits.

mod aggregate;
mod coefficients;
mod degradation;
mod error;
mod predictor;
mod quantization;
mod sampler;
pub mod scale;

pub use aggregate::{aggregate, DegradationTriple, ReportingScale};
pub use coefficients::{
    coarse_qp, refined_qp, spatio_temporal, CoarseQpCoefficients, CodingCurve, ModelCoefficients,
    RefinedQpCoefficients, SpatioTemporalCoefficients,
};
pub use degradation::{
    coding_degradation, temporal_degradation, upscaling_degradation,
    weighted_coding_degradation, REFERENCE_FRAMERATE,
};
pub use error::{ModelError, Result};
pub use predictor::{DeviceProfile, PredictionResult, Predictor, ViewingDistance};
pub use quantization::{
    estimate_quantization, ModelVariant, QuantizationEstimate, UNSUPPORTED_SENTINEL,
};
pub use sampler::{per_second_scores, seconds_for};
