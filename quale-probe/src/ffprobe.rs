//! ffprobe subprocess invocation and JSON parsing.

use crate::error::{ProbeError, Result};
use crate::MediaProbe;
use quale_core::{FrameStat, PictureType, ProbeMetadata, VideoCodec};
use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Stream-level fields requested from ffprobe.
const STREAM_ENTRIES: &str = "stream=bit_rate,codec_name,avg_frame_rate,height,width,duration";

/// Frame-level fields requested from ffprobe.
const FRAME_ENTRIES: &str = "frame=pict_type,pkt_size";

/// Prober backed by the `ffprobe` executable.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    /// Executable name or path; defaults to `ffprobe` on PATH.
    program: String,
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self {
            program: "ffprobe".to_string(),
        }
    }
}

impl FfprobeProber {
    /// Create a prober using the default `ffprobe` on PATH.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific ffprobe executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, path: &Path, args: &[&str]) -> Result<Vec<u8>> {
        if !path.is_file() {
            return Err(ProbeError::FileNotFound(path.to_path_buf()));
        }

        debug!("running {} {:?} {}", self.program, args, path.display());
        let output = Command::new(&self.program)
            .args(args)
            .arg(path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

impl MediaProbe for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<ProbeMetadata> {
        let stdout = self.run(
            path,
            &[
                "-loglevel",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                STREAM_ENTRIES,
                "-show_entries",
                "format=bit_rate,duration",
                "-of",
                "json",
            ],
        )?;

        let doc: ProbeDocument = serde_json::from_slice(&stdout)?;
        parse_metadata(path, doc)
    }

    fn frame_stats(&self, path: &Path) -> Result<Vec<FrameStat>> {
        let stdout = self.run(
            path,
            &[
                "-loglevel",
                "error",
                "-select_streams",
                "v:0",
                "-show_frames",
                "-show_entries",
                FRAME_ENTRIES,
                "-of",
                "json",
            ],
        )?;

        let doc: FramesDocument = serde_json::from_slice(&stdout)?;
        let stats = doc
            .frames
            .into_iter()
            .filter_map(|f| {
                let size = f.pkt_size?.parse().ok()?;
                Some(FrameStat {
                    picture_type: PictureType::parse(f.pict_type.as_deref().unwrap_or("")),
                    size,
                })
            })
            .collect::<Vec<_>>();
        debug!("extracted {} frame records from {}", stats.len(), path.display());
        Ok(stats)
    }
}

#[derive(Debug, Deserialize)]
struct ProbeDocument {
    #[serde(default)]
    streams: Vec<StreamEntry>,
    #[serde(default)]
    format: Option<FormatEntry>,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    bit_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FormatEntry {
    bit_rate: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FramesDocument {
    #[serde(default)]
    frames: Vec<FrameEntry>,
}

#[derive(Debug, Deserialize)]
struct FrameEntry {
    pict_type: Option<String>,
    pkt_size: Option<String>,
}

fn parse_metadata(path: &Path, doc: ProbeDocument) -> Result<ProbeMetadata> {
    let stream = doc
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| ProbeError::MissingVideoStream(path.to_path_buf()))?;

    let codec_name = stream.codec_name.ok_or(ProbeError::InvalidField {
        path: path.to_path_buf(),
        field: "codec_name",
    })?;

    let width = stream.width.ok_or(ProbeError::InvalidField {
        path: path.to_path_buf(),
        field: "width",
    })?;
    let height = stream.height.ok_or(ProbeError::InvalidField {
        path: path.to_path_buf(),
        field: "height",
    })?;

    // Stream-level bitrate/duration are absent in some containers (mkv);
    // the format section carries them instead.
    let bitrate = stream
        .bit_rate
        .as_deref()
        .and_then(parse_numeric)
        .or_else(|| {
            doc.format
                .as_ref()
                .and_then(|f| f.bit_rate.as_deref())
                .and_then(parse_numeric)
        })
        .ok_or(ProbeError::InvalidField {
            path: path.to_path_buf(),
            field: "bit_rate",
        })?;

    let duration = stream
        .duration
        .as_deref()
        .and_then(parse_numeric)
        .or_else(|| {
            doc.format
                .as_ref()
                .and_then(|f| f.duration.as_deref())
                .and_then(parse_numeric)
        })
        .ok_or(ProbeError::InvalidField {
            path: path.to_path_buf(),
            field: "duration",
        })?;

    Ok(ProbeMetadata {
        bitrate,
        avg_frame_rate: stream.avg_frame_rate.as_deref().and_then(parse_frame_rate),
        width,
        height,
        codec: VideoCodec::parse(&codec_name),
        duration,
    })
}

fn parse_numeric(s: &str) -> Option<f64> {
    let value: f64 = s.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse an ffprobe rational framerate such as `30000/1001`.
///
/// `0/0` and other degenerate rationals mean the container does not know
/// its framerate; that maps to `None`, not to a guess.
fn parse_frame_rate(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den == 0.0 || num <= 0.0 {
            return None;
        }
        return Some(num / den);
    }
    let value: f64 = s.parse().ok()?;
    (value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("unknown"), None);
        assert_eq!(parse_frame_rate("25"), Some(25.0));
    }

    #[test]
    fn test_parse_metadata_from_stream() {
        let doc: ProbeDocument = serde_json::from_str(
            r#"{
                "streams": [{
                    "codec_name": "h264",
                    "width": 3840,
                    "height": 2160,
                    "avg_frame_rate": "30/1",
                    "bit_rate": "5120000",
                    "duration": "10.000000"
                }]
            }"#,
        )
        .unwrap();

        let meta = parse_metadata(Path::new("clip.mp4"), doc).unwrap();
        assert_eq!(meta.codec, VideoCodec::H264);
        assert_eq!(meta.width, 3840);
        assert_eq!(meta.avg_frame_rate, Some(30.0));
        assert_eq!(meta.bitrate, 5_120_000.0);
        assert_eq!(meta.duration, 10.0);
    }

    #[test]
    fn test_parse_metadata_format_fallback() {
        // mkv-style output: bitrate and duration only at format level.
        let doc: ProbeDocument = serde_json::from_str(
            r#"{
                "streams": [{
                    "codec_name": "vp9",
                    "width": 1920,
                    "height": 1080,
                    "avg_frame_rate": "0/0"
                }],
                "format": { "bit_rate": "2048000", "duration": "6.5" }
            }"#,
        )
        .unwrap();

        let meta = parse_metadata(Path::new("clip.mkv"), doc).unwrap();
        assert_eq!(meta.codec, VideoCodec::Vp9);
        assert_eq!(meta.avg_frame_rate, None);
        assert_eq!(meta.bitrate, 2_048_000.0);
        assert_eq!(meta.duration, 6.5);
    }

    #[test]
    fn test_parse_metadata_no_stream() {
        let doc: ProbeDocument = serde_json::from_str(r#"{"streams": []}"#).unwrap();
        let err = parse_metadata(Path::new("audio.ogg"), doc).unwrap_err();
        assert!(matches!(err, ProbeError::MissingVideoStream(_)));
    }

    #[test]
    fn test_parse_frames_document() {
        let doc: FramesDocument = serde_json::from_str(
            r#"{"frames": [
                {"pict_type": "I", "pkt_size": "50000"},
                {"pict_type": "P", "pkt_size": "12000"},
                {"pict_type": "B", "pkt_size": "8000"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.frames.len(), 3);
        assert_eq!(doc.frames[0].pict_type.as_deref(), Some("I"));
    }
}
