//! The three degradation estimators, all on the 0–100 impairment scale.

use crate::coefficients::{CodingCurve, ModelCoefficients, SpatioTemporalCoefficients};
use crate::error::Result;
use crate::scale;
use quale_core::{DeviceClass, VideoCodec};

/// Framerate treated as temporally transparent.
pub const REFERENCE_FRAMERATE: f64 = 60.0;

/// Coding degradation for one codec curve.
///
/// The exponential MOS-shaped curve is clipped to the opinion scale,
/// converted to the impairment scale and reflected, so 0 means no coding
/// impairment and 100 means the worst.
pub fn coding_degradation(quant: f64, curve: &CodingCurve) -> f64 {
    let mos_q = (curve.a + curve.b * (curve.c * quant + curve.d).exp()).clamp(1.0, 5.0);
    let on_r = scale::r_from_mos(mos_q);
    (100.0 - on_r).clamp(0.0, 100.0)
}

/// Codec-indicator-weighted coding degradation for one video.
///
/// Binarizing the codec column gives exactly one indicator per supported
/// codec; the row's degradation is the indicator-weighted sum across the
/// curves, which selects the matching codec's curve. A row whose codec is
/// outside the tables has all-zero indicators and contributes nothing —
/// the −1 quantization sentinel never reaches a curve.
pub fn weighted_coding_degradation(
    codec: &VideoCodec,
    quant: f64,
    class: DeviceClass,
    coefficients: &ModelCoefficients,
) -> Result<f64> {
    let mut total = 0.0;
    for candidate in &VideoCodec::SUPPORTED {
        if codec != candidate {
            // One-hot indicator is zero; the term vanishes.
            continue;
        }
        let curve = coefficients.curve(class, candidate)?;
        total += coding_degradation(quant, &curve);
    }
    Ok(total)
}

/// Upscaling degradation: penalty for presenting fewer coded pixels than
/// the display has, `clip(x·ln(y·res/display), 0, 100)`.
pub fn upscaling_degradation(
    resolution: f64,
    display_resolution: f64,
    st: &SpatioTemporalCoefficients,
) -> f64 {
    let raw = st.x * (st.y * resolution / display_resolution).ln();
    clip_degradation(raw)
}

/// Temporal degradation: penalty for framerates below the 60 fps
/// reference, `clip(z·ln(k·fps/60), 0, 100)`.
pub fn temporal_degradation(framerate: f64, st: &SpatioTemporalCoefficients) -> f64 {
    let raw = st.z * (st.k * framerate / REFERENCE_FRAMERATE).ln();
    clip_degradation(raw)
}

/// Clamp to [0, 100]; NaN (only reachable from pathological inputs such
/// as 0/0 ratios) maps to zero degradation rather than poisoning the sum.
fn clip_degradation(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::spatio_temporal;

    fn curve() -> CodingCurve {
        CodingCurve {
            a: 5.0,
            b: -0.5,
            c: 4.0,
            d: -1.0,
        }
    }

    #[test]
    fn test_coding_degradation_range() {
        for i in 0..=100 {
            let quant = i as f64 / 100.0;
            let deg = coding_degradation(quant, &curve());
            assert!((0.0..=100.0).contains(&deg), "quant={quant} -> {deg}");
        }
        // Extreme quant values stay clipped.
        assert!((0.0..=100.0).contains(&coding_degradation(1000.0, &curve())));
        assert!((0.0..=100.0).contains(&coding_degradation(-1000.0, &curve())));
    }

    #[test]
    fn test_coding_degradation_monotone_in_quant() {
        // Heavier quantization can only degrade more.
        let low = coding_degradation(0.2, &curve());
        let high = coding_degradation(0.8, &curve());
        assert!(high > low);
    }

    #[test]
    fn test_weighted_selects_matching_codec() {
        let coeffs = ModelCoefficients::builtin();
        let deg = weighted_coding_degradation(
            &VideoCodec::H264,
            0.5,
            DeviceClass::Pc,
            &coeffs,
        )
        .unwrap();
        let direct = coding_degradation(
            0.5,
            &coeffs.curve(DeviceClass::Pc, &VideoCodec::H264).unwrap(),
        );
        assert_eq!(deg, direct);
    }

    #[test]
    fn test_weighted_unsupported_contributes_nothing() {
        let coeffs = ModelCoefficients::builtin();
        let deg = weighted_coding_degradation(
            &VideoCodec::Other("av1".into()),
            -1.0,
            DeviceClass::Pc,
            &coeffs,
        )
        .unwrap();
        assert_eq!(deg, 0.0);
    }

    #[test]
    fn test_upscaling_clipping_law() {
        let st = spatio_temporal(DeviceClass::Pc);
        // Native 4K on a 4K display: ratio > 1, log positive, x negative
        // -> clipped to 0.
        assert_eq!(upscaling_degradation(8_294_400.0, 8_294_400.0, &st), 0.0);
        // Heavy upscale degrades but stays bounded.
        let deg = upscaling_degradation(230_400.0, 8_294_400.0, &st);
        assert!(deg > 0.0 && deg <= 100.0);
        // Pathological inputs stay in range.
        assert!((0.0..=100.0).contains(&upscaling_degradation(0.0, 8_294_400.0, &st)));
        assert!((0.0..=100.0).contains(&upscaling_degradation(f64::INFINITY, 8_294_400.0, &st)));
    }

    #[test]
    fn test_temporal_clipping_law() {
        let st = spatio_temporal(DeviceClass::Pc);
        assert_eq!(temporal_degradation(60.0, &st), 0.0);
        let deg = temporal_degradation(10.0, &st);
        assert!(deg > 0.0 && deg <= 100.0);
        assert!((0.0..=100.0).contains(&temporal_degradation(f64::INFINITY, &st)));
        assert!((0.0..=100.0).contains(&temporal_degradation(0.0, &st)));
    }

    #[test]
    fn test_mobile_penalizes_low_framerate_more() {
        let pc = spatio_temporal(DeviceClass::Pc);
        let mobile = spatio_temporal(DeviceClass::Mobile);
        assert!(temporal_degradation(12.0, &mobile) > temporal_degradation(12.0, &pc));
    }
}
