//! Hybrid quality prediction.
//!
//! The hybrid mode re-encodes the input at controlled settings with an
//! external encoder, runs the full no-reference pipeline on the probe
//! encode, and corrects the resulting scores for the transcoding round
//! trip with a fixed per-source-codec affine transform.

mod correct;
mod encoder;
mod error;
mod predict;

pub use correct::{correction_for, rescale_per_second, AffineCorrection};
pub use encoder::{EncodeSettings, FfmpegEncoder, VideoEncoder};
pub use error::{HybridError, Result};
pub use predict::{HybridOptions, HybridPredictor, HybridStrategy};
