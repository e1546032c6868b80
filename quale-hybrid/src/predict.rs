//! Hybrid prediction: encode, repredict, correct.

use crate::correct::correct;
use crate::encoder::{EncodeSettings, VideoEncoder};
use crate::error::HybridError;
use quale_core::VideoCodec;
use quale_features::FeatureCache;
use quale_model::{PredictionResult, Predictor};
use quale_probe::MediaProbe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How the probe re-encode picks its target codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HybridStrategy {
    /// Re-encode with the source's own codec; scores are reported as-is.
    SameCodec,
    /// Re-encode with HEVC regardless of source, then apply the
    /// per-source-codec affine correction.
    #[default]
    Hevc,
}

/// Hybrid mode options.
#[derive(Debug, Clone)]
pub struct HybridOptions {
    /// Codec the source is declared to carry. Selects the re-encode
    /// target for [`HybridStrategy::SameCodec`] and the correction for
    /// [`HybridStrategy::Hevc`].
    pub source_codec: Option<VideoCodec>,
    pub strategy: HybridStrategy,
    /// Target bitrate (ffmpeg style), width, height, framerate.
    pub bitrate: String,
    pub width: u32,
    pub height: u32,
    pub framerate: f64,
    /// Directory for re-encoded probe artifacts.
    pub reencode_dir: PathBuf,
    /// Keep re-encoded artifacts for later runs instead of deleting them.
    pub keep_reencodes: bool,
}

impl HybridOptions {
    /// Resolve the re-encode settings according to the strategy.
    pub fn encode_settings(&self) -> crate::Result<EncodeSettings> {
        let codec = match self.strategy {
            HybridStrategy::Hevc => VideoCodec::Hevc,
            HybridStrategy::SameCodec => self
                .source_codec
                .clone()
                .ok_or(HybridError::MissingSourceCodec)?,
        };
        Ok(EncodeSettings {
            codec,
            bitrate: self.bitrate.clone(),
            width: self.width,
            height: self.height,
            framerate: self.framerate,
        })
    }
}

/// Full hybrid pipeline around a sequence predictor.
pub struct HybridPredictor<E> {
    encoder: E,
    predictor: Predictor,
    options: HybridOptions,
}

impl<E: VideoEncoder> HybridPredictor<E> {
    pub fn new(encoder: E, predictor: Predictor, options: HybridOptions) -> Self {
        Self {
            encoder,
            predictor,
            options,
        }
    }

    pub fn options(&self) -> &HybridOptions {
        &self.options
    }

    /// Re-encode `video`, predict the probe encode's quality, and apply
    /// the round-trip correction where the strategy calls for one.
    pub fn predict_file(
        &self,
        video: &Path,
        probe: &dyn MediaProbe,
        cache: Option<&FeatureCache>,
    ) -> quale_core::Result<PredictionResult> {
        let settings = self.options.encode_settings()?;
        let re_encoded = self
            .encoder
            .encode(video, &settings, &self.options.reencode_dir)?;
        info!("re-encoded probe video at {}", re_encoded.display());

        let result = self.predictor.predict_file(&re_encoded, probe, cache)?;

        if !self.options.keep_reencodes {
            debug!("removing re-encoded artifact {}", re_encoded.display());
            std::fs::remove_file(&re_encoded)?;
        }

        match self.options.strategy {
            // Same-codec re-encodes report the probe encode's scores
            // directly.
            HybridStrategy::SameCodec => Ok(result),
            HybridStrategy::Hevc => {
                let source_codec = self
                    .options
                    .source_codec
                    .clone()
                    .unwrap_or_else(|| VideoCodec::Other("unknown".to_string()));
                Ok(correct(&result, &source_codec))
            }
        }
    }
}
