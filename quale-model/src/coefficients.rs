//! Fixed regression coefficients and the external coefficient document.
//!
//! The QP regression and viewing-condition constants are fixed per
//! (device class, codec) and ship with the model; the coding-curve
//! constants come from a JSON configuration document so deployments can
//! swap trained parameter sets without rebuilding.

use crate::error::{ModelError, Result};
use quale_core::{DeviceClass, VideoCodec};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Coefficients of the coarse QP regression:
/// `pred_qp = a + b·ln(bitrate) + c·ln(resolution) + d·ln(framerate)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoarseQpCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// Coefficients of the refined QP regression:
/// `pred_qp = a + b·ln(mean_noni_size) + c·ln(resolution)
///  + d·ln(framerate) + e·ln(i_to_noni_mean_ratio)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinedQpCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

/// Viewing-condition constants for the spatial and temporal degradation
/// terms: `x·ln(y·res/display)` and `z·ln(k·fps/60)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatioTemporalCoefficients {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub k: f64,
}

/// Coarse QP regression table.
///
/// Returns `None` for codecs outside the model; callers translate that
/// into the −1 sentinel.
pub fn coarse_qp(class: DeviceClass, codec: &VideoCodec) -> Option<CoarseQpCoefficients> {
    let (a, b, c, d) = match (class, codec) {
        (DeviceClass::Pc, VideoCodec::H264) => {
            (-5.72843619, -5.35863448, 4.19647182, 5.62309933)
        }
        (DeviceClass::Pc, VideoCodec::Hevc) => {
            (-7.68665264, -6.02561845, 4.82981247, 4.08694769)
        }
        (DeviceClass::Pc, VideoCodec::Vp9) => {
            (-140.838395, -46.5290494, 37.5395453, 27.5875919)
        }
        (DeviceClass::Mobile, VideoCodec::H264) => {
            (-1.46439015, -4.92630532, 4.37840851, 3.01147460)
        }
        (DeviceClass::Mobile, VideoCodec::Hevc) => {
            (-1.65354441, -5.86551697, 4.76721523, 2.34100646)
        }
        (DeviceClass::Mobile, VideoCodec::Vp9) => {
            (-65.7419925, -41.0775277, 28.7095166, 30.8075359)
        }
        (_, VideoCodec::Other(_)) => return None,
    };
    Some(CoarseQpCoefficients { a, b, c, d })
}

/// Refined QP regression table.
pub fn refined_qp(class: DeviceClass, codec: &VideoCodec) -> Option<RefinedQpCoefficients> {
    let (a, b, c, d, e) = match (class, codec) {
        (DeviceClass::Pc, VideoCodec::H264) => {
            (28.4333174, -7.39512320, 5.78207198, 0.24788992, -5.45370021)
        }
        (DeviceClass::Pc, VideoCodec::Hevc) => {
            (22.3936569, -6.52974529, 5.15729271, -0.89995975, -2.28896532)
        }
        (DeviceClass::Pc, VideoCodec::Vp9) => {
            (92.1245351, -51.1209683, 40.6831660, -10.2195346, -18.7808971)
        }
        (DeviceClass::Mobile, VideoCodec::H264) => {
            (30.6150034, -7.40096124, 6.11739209, -0.86271189, -6.51258585)
        }
        (DeviceClass::Mobile, VideoCodec::Hevc) => {
            (29.6766107, -7.05771310, 5.77213226, -3.04775031, -3.83762247)
        }
        (DeviceClass::Mobile, VideoCodec::Vp9) => {
            (145.132249, -49.8642457, 34.3946143, 1.83157999, -24.9768715)
        }
        (_, VideoCodec::Other(_)) => return None,
    };
    Some(RefinedQpCoefficients { a, b, c, d, e })
}

/// Viewing-condition constants per device class.
pub fn spatio_temporal(class: DeviceClass) -> SpatioTemporalCoefficients {
    match class {
        DeviceClass::Pc => SpatioTemporalCoefficients {
            x: -12.8292,
            y: 2.4358,
            z: -41.0545,
            k: 3.7547,
        },
        DeviceClass::Mobile => SpatioTemporalCoefficients {
            x: -10.4174,
            y: 2.2679,
            z: -57.1618,
            k: 3.5766,
        },
    }
}

/// Coding-curve constants for one codec:
/// `mos_q = clip(a + b·exp(c·quant + d), 1, 5)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodingCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// The external coefficient document:
/// `{device_class -> {params -> {codec_coefficient -> f64}}}`.
///
/// Lookups are strict; a missing (device class, codec, coefficient)
/// combination is a fatal error, never a default.
#[derive(Debug, Clone)]
pub struct ModelCoefficients {
    pc: HashMap<String, f64>,
    mobile: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct Document {
    pc: DeviceSection,
    mobile: DeviceSection,
}

#[derive(Debug, Deserialize)]
struct DeviceSection {
    params: HashMap<String, f64>,
}

impl ModelCoefficients {
    /// Parse a coefficient document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(json)?;
        Ok(Self {
            pc: doc.pc.params,
            mobile: doc.mobile.params,
        })
    }

    /// Load a coefficient document from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The coefficient document shipped with the crate.
    pub fn builtin() -> Self {
        // The embedded document is part of the crate; failing to parse it
        // would be a packaging bug, caught by tests.
        Self::from_json(include_str!("../models/default.json"))
            .unwrap_or_else(|e| panic!("embedded model document is invalid: {e}"))
    }

    fn section(&self, class: DeviceClass) -> &HashMap<String, f64> {
        match class {
            DeviceClass::Pc => &self.pc,
            DeviceClass::Mobile => &self.mobile,
        }
    }

    fn lookup(&self, class: DeviceClass, name: &str) -> Result<f64> {
        self.section(class)
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::MissingCoefficient {
                device_class: class.key(),
                name: name.to_string(),
            })
    }

    /// Coding-curve constants for one supported codec.
    pub fn curve(&self, class: DeviceClass, codec: &VideoCodec) -> Result<CodingCurve> {
        let key = codec.name();
        Ok(CodingCurve {
            a: self.lookup(class, &format!("{key}_a"))?,
            b: self.lookup(class, &format!("{key}_b"))?,
            c: self.lookup(class, &format!("{key}_c"))?,
            d: self.lookup(class, &format!("{key}_d"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_table_covers_supported_codecs() {
        for class in [DeviceClass::Pc, DeviceClass::Mobile] {
            for codec in &VideoCodec::SUPPORTED {
                assert!(coarse_qp(class, codec).is_some());
                assert!(refined_qp(class, codec).is_some());
            }
        }
    }

    #[test]
    fn test_unsupported_codec_has_no_coefficients() {
        let av1 = VideoCodec::Other("av1".into());
        assert!(coarse_qp(DeviceClass::Pc, &av1).is_none());
        assert!(refined_qp(DeviceClass::Mobile, &av1).is_none());
    }

    #[test]
    fn test_builtin_document_parses_and_resolves() {
        let coeffs = ModelCoefficients::builtin();
        for class in [DeviceClass::Pc, DeviceClass::Mobile] {
            for codec in &VideoCodec::SUPPORTED {
                let curve = coeffs.curve(class, codec).unwrap();
                assert!(curve.a.is_finite());
                assert!(curve.b.is_finite());
            }
        }
    }

    #[test]
    fn test_missing_coefficient_is_fatal() {
        let coeffs = ModelCoefficients::from_json(
            r#"{
                "pc": { "params": { "h264_a": 5.0, "h264_b": -0.5, "h264_c": 4.0 } },
                "mobile": { "params": {} }
            }"#,
        )
        .unwrap();

        let err = coeffs.curve(DeviceClass::Pc, &VideoCodec::H264).unwrap_err();
        match err {
            ModelError::MissingCoefficient { device_class, name } => {
                assert_eq!(device_class, "pc");
                assert_eq!(name, "h264_d");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
