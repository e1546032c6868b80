//! Conversions between the 1–5 opinion scale and the 0–100 impairment
//! scale ("R"), plus the reporting-granularity maps.
//!
//! Both directions are pure, stateless and strictly monotonic over their
//! valid domains, and are mutual inverses to well below 1e-6.

/// Lowest opinion score.
pub const MOS_MIN: f64 = 1.0;
/// Highest opinion score.
pub const MOS_MAX: f64 = 5.0;

/// Amplitude of the cubic ripple term. Kept below 0.04/6000 so the map
/// stays strictly increasing over the whole R range.
const RIPPLE: f64 = 6.0e-6;

/// Map an impairment value R ∈ [0, 100] to an opinion score in [1, 5].
///
/// R = 100 means no impairment. Values outside [0, 100] clip to the
/// endpoint scores.
pub fn mos_from_r(r: f64) -> f64 {
    if r.is_nan() || r <= 0.0 {
        return MOS_MIN;
    }
    if r >= 100.0 {
        return MOS_MAX;
    }
    MOS_MIN + (MOS_MAX - MOS_MIN) / 100.0 * r + r * (r - 60.0) * (100.0 - r) * RIPPLE
}

/// Map an opinion score in [1, 5] to an impairment value in [0, 100].
///
/// Numeric inverse of [`mos_from_r`] by bisection; the forward map is
/// strictly increasing so the inverse is well defined.
pub fn r_from_mos(mos: f64) -> f64 {
    let target = mos.clamp(MOS_MIN, MOS_MAX);
    if target <= MOS_MIN {
        return 0.0;
    }
    if target >= MOS_MAX {
        return 100.0;
    }

    let mut lo = 0.0_f64;
    let mut hi = 100.0_f64;
    // 60 halvings take the bracket below 1e-16, far past the 1e-6
    // round-trip requirement.
    for _ in 0..60 {
        let mid = 0.5 * (lo + hi);
        if mos_from_r(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Stretch a score from the [1, 4.5] rating range onto the 5-point
/// reporting scale, clipped to [1, 5].
pub fn map_to_5(score: f64) -> f64 {
    ((score - 1.0) * 4.0 / 3.5 + 1.0).clamp(MOS_MIN, MOS_MAX)
}

/// Compress a score from the 5-point scale onto the [1, 4.5] rating
/// range used for coarser reporting.
pub fn map_to_45(score: f64) -> f64 {
    ((score - 1.0) * 3.5 / 4.0 + 1.0).clamp(MOS_MIN, 4.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(mos_from_r(0.0), 1.0);
        assert_eq!(mos_from_r(100.0), 5.0);
        assert_eq!(mos_from_r(-10.0), 1.0);
        assert_eq!(mos_from_r(250.0), 5.0);
        assert_eq!(r_from_mos(1.0), 0.0);
        assert_eq!(r_from_mos(5.0), 100.0);
    }

    #[test]
    fn test_monotonic() {
        let mut prev = mos_from_r(0.0);
        for i in 1..=1000 {
            let r = i as f64 * 0.1;
            let mos = mos_from_r(r);
            assert!(
                mos > prev,
                "mos_from_r not increasing at r={r}: {mos} <= {prev}"
            );
            prev = mos;
        }
    }

    #[test]
    fn test_round_trip_law() {
        // 1000 evenly spaced opinion scores must survive the round trip
        // within 1e-6.
        for i in 0..1000 {
            let x = 1.0 + 4.0 * i as f64 / 999.0;
            let back = mos_from_r(r_from_mos(x));
            assert!(
                (back - x).abs() < 1e-6,
                "round trip failed at {x}: got {back}"
            );
        }
    }

    #[test]
    fn test_nan_clips_to_floor() {
        assert_eq!(mos_from_r(f64::NAN), 1.0);
    }

    #[test]
    fn test_reporting_maps() {
        assert_eq!(map_to_5(1.0), 1.0);
        assert!((map_to_5(4.5) - 5.0).abs() < 1e-12);
        assert_eq!(map_to_5(5.0), 5.0); // clipped
        assert_eq!(map_to_45(1.0), 1.0);
        assert!((map_to_45(5.0) - 4.5).abs() < 1e-12);
        // The two maps are inverses over [1, 4.5].
        for i in 0..=35 {
            let x = 1.0 + 0.1 * i as f64;
            assert!((map_to_45(map_to_5(x)) - x).abs() < 1e-12);
        }
    }
}
