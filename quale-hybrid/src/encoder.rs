//! Re-encoding collaborator.

use crate::error::{HybridError, Result};
use quale_core::VideoCodec;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Target settings for the probe re-encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// Target codec of the re-encode.
    pub codec: VideoCodec,
    /// Target bitrate, ffmpeg style (`100k`, `5M`).
    pub bitrate: String,
    pub width: u32,
    pub height: u32,
    pub framerate: f64,
}

impl EncodeSettings {
    /// ffmpeg encoder name for the target codec.
    pub fn encoder_name(&self) -> Result<&'static str> {
        match self.codec {
            VideoCodec::H264 => Ok("libx264"),
            VideoCodec::Hevc => Ok("libx265"),
            VideoCodec::Vp9 => Ok("libvpx-vp9"),
            VideoCodec::Other(ref name) => Err(HybridError::NoEncoder(name.clone())),
        }
    }

    /// Settings key embedded in the re-encoded artifact's file name, so
    /// different settings never collide in the re-encode cache.
    pub fn key(&self) -> Result<String> {
        Ok(format!(
            "{}_{}_{}_{}_{}",
            self.bitrate,
            self.width,
            self.height,
            self.framerate,
            self.encoder_name()?
        ))
    }
}

/// Producer of re-encoded probe videos.
pub trait VideoEncoder {
    /// Re-encode `source` with `settings`, placing the artifact in
    /// `out_dir`, and return its path. An artifact already present for
    /// the same (source, settings) pair is reused.
    fn encode(&self, source: &Path, settings: &EncodeSettings, out_dir: &Path) -> Result<PathBuf>;
}

/// Encoder backed by the `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: String,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
        }
    }
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific ffmpeg executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build_args(source: &Path, settings: &EncodeSettings, output: &Path) -> Result<Vec<String>> {
        Ok(vec![
            "-nostdin".into(),
            "-loglevel".into(),
            "error".into(),
            "-threads".into(),
            "4".into(),
            "-y".into(),
            "-i".into(),
            source.to_string_lossy().into_owned(),
            "-c:v".into(),
            settings.encoder_name()?.into(),
            "-b:v".into(),
            settings.bitrate.clone(),
            "-vf".into(),
            format!("scale={}:{}", settings.width, settings.height),
            "-r".into(),
            settings.framerate.to_string(),
            "-pix_fmt".into(),
            "yuv420p".into(),
            "-an".into(),
            output.to_string_lossy().into_owned(),
        ])
    }
}

/// File name of the re-encoded artifact: flattened source name plus the
/// settings key.
pub(crate) fn artifact_path(
    source: &Path,
    settings: &EncodeSettings,
    out_dir: &Path,
) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    Ok(out_dir.join(format!("{stem}_settings_{}.mkv", settings.key()?)))
}

impl VideoEncoder for FfmpegEncoder {
    fn encode(&self, source: &Path, settings: &EncodeSettings, out_dir: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(HybridError::SourceNotFound(source.to_path_buf()));
        }
        std::fs::create_dir_all(out_dir)?;

        let output = artifact_path(source, settings, out_dir)?;
        if output.is_file() {
            warn!(
                "{} already re-encoded with these settings, reusing {}",
                source.display(),
                output.display()
            );
            return Ok(output);
        }

        let args = Self::build_args(source, settings, &output)?;
        debug!("encoding command: {} {:?}", self.program, args);

        let result = Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        if !result.status.success() {
            return Err(HybridError::EncodeFailed {
                path: source.to_path_buf(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        if !output.is_file() {
            return Err(HybridError::MissingOutput(output));
        }
        Ok(output)
    }
}
