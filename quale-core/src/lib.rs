//! Core types for the quale video quality estimator.
//!
//! This crate defines the data model shared by every other quale crate:
//! codec and device identification, probed stream metadata, per-frame size
//! records, and the error hierarchy.

pub mod error;

pub use error::{Error, Result};

use serde::{Deserialize, Serialize};

/// Video codec of an encoded stream.
///
/// The quality model only carries coefficients for h264, hevc and vp9.
/// Anything else is preserved verbatim in the `Other` arm so it can be
/// reported, but it never participates in coefficient lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    Hevc,
    Vp9,
    /// Codec outside the model's coefficient tables (raw ffprobe name).
    Other(String),
}

impl VideoCodec {
    /// Parse an ffprobe `codec_name`.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "h264" | "avc" => VideoCodec::H264,
            "hevc" | "h265" => VideoCodec::Hevc,
            "vp9" => VideoCodec::Vp9,
            other => VideoCodec::Other(other.to_string()),
        }
    }

    /// Whether the model carries coefficients for this codec.
    pub fn is_supported(&self) -> bool {
        !matches!(self, VideoCodec::Other(_))
    }

    /// Native quantization-parameter range used to normalize predicted QP.
    ///
    /// `None` for unsupported codecs, which take the −1 sentinel instead.
    pub fn qp_range(&self) -> Option<f64> {
        match self {
            VideoCodec::H264 | VideoCodec::Hevc => Some(63.0),
            VideoCodec::Vp9 => Some(255.0),
            VideoCodec::Other(_) => None,
        }
    }

    /// Canonical lowercase name (the raw name for `Other`).
    pub fn name(&self) -> &str {
        match self {
            VideoCodec::H264 => "h264",
            VideoCodec::Hevc => "hevc",
            VideoCodec::Vp9 => "vp9",
            VideoCodec::Other(name) => name,
        }
    }

    /// All codecs the model supports, in table order.
    pub const SUPPORTED: [VideoCodec; 3] =
        [VideoCodec::H264, VideoCodec::Hevc, VideoCodec::Vp9];
}

impl std::fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Playout device reported by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Pc,
    Tv,
    Tablet,
    Mobile,
}

impl DeviceType {
    /// Parse a user-supplied device name.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "pc" => Ok(DeviceType::Pc),
            "tv" => Ok(DeviceType::Tv),
            "tablet" => Ok(DeviceType::Tablet),
            "mobile" => Ok(DeviceType::Mobile),
            other => Err(Error::invalid_input(format!(
                "unsupported device type '{other}', expected one of pc, tv, tablet, mobile"
            ))),
        }
    }

    /// Coefficient class for this device.
    pub fn class(self) -> DeviceClass {
        match self {
            DeviceType::Pc | DeviceType::Tv => DeviceClass::Pc,
            DeviceType::Tablet | DeviceType::Mobile => DeviceClass::Mobile,
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeviceType::Pc => "pc",
            DeviceType::Tv => "tv",
            DeviceType::Tablet => "tablet",
            DeviceType::Mobile => "mobile",
        };
        f.write_str(name)
    }
}

/// Coefficient table selector. Pc and tv share one table, everything else
/// uses the mobile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Pc,
    Mobile,
}

impl DeviceClass {
    /// Key used in the model configuration document.
    pub fn key(self) -> &'static str {
        match self {
            DeviceClass::Pc => "pc",
            DeviceClass::Mobile => "mobile",
        }
    }
}

/// Video resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count.
    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Parse a `WIDTHxHEIGHT` string such as `3840x2160`.
    pub fn parse(s: &str) -> Result<Self> {
        let (w, h) = s
            .split_once('x')
            .ok_or_else(|| Error::invalid_input(format!("invalid resolution '{s}', expected WxH")))?;
        let width: u32 = w
            .parse()
            .map_err(|_| Error::invalid_input(format!("invalid resolution width '{w}'")))?;
        let height: u32 = h
            .parse()
            .map_err(|_| Error::invalid_input(format!("invalid resolution height '{h}'")))?;
        if width == 0 || height == 0 {
            return Err(Error::invalid_input(format!(
                "resolution '{s}' must have non-zero dimensions"
            )));
        }
        Ok(Self { width, height })
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Stream metadata produced once per video by the prober.
///
/// Read-only input to the prediction core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeMetadata {
    /// Average stream bitrate in bits per second.
    pub bitrate: f64,
    /// Average framerate in fps; `None` when the container reports unknown.
    pub avg_frame_rate: Option<f64>,
    pub width: u32,
    pub height: u32,
    pub codec: VideoCodec,
    /// Duration in seconds.
    pub duration: f64,
}

impl ProbeMetadata {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }
}

/// Coded picture type as reported by the prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PictureType {
    /// Intra-coded frame.
    I,
    /// Any predicted frame type (P, B, ...).
    NonI,
}

impl PictureType {
    /// Map an ffprobe `pict_type` string; everything that is not `I` is
    /// treated as non-intra.
    pub fn parse(s: &str) -> Self {
        if s == "I" {
            PictureType::I
        } else {
            PictureType::NonI
        }
    }
}

/// One coded frame's packet statistics, in bitstream decode order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameStat {
    pub picture_type: PictureType,
    /// Packet size in bytes.
    pub size: u64,
}
