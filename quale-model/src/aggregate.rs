//! Combination of the three degradation terms into a sequence score.

use crate::scale;
use serde::{Deserialize, Serialize};

/// The three degradation terms of one prediction, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegradationTriple {
    pub coding: f64,
    pub upscaling: f64,
    pub temporal: f64,
}

/// Reporting granularity, selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportingScale {
    /// Full 5-point scale.
    #[default]
    Five,
    /// Coarser 4.5-capped scale.
    FourFive,
}

/// Combine the degradation terms on the impairment scale and map the
/// result back to the opinion scale.
///
/// A single deterministic function: `R = 100 − (coding + upscaling +
/// temporal)`, then `mos_from_r`, clip to [1, 5], then the selected
/// reporting map.
pub fn aggregate(triple: &DegradationTriple, reporting: ReportingScale) -> f64 {
    let on_r = 100.0 - (triple.coding + triple.upscaling + triple.temporal);
    let mos = scale::mos_from_r(on_r).clamp(1.0, 5.0);
    match reporting {
        ReportingScale::Five => scale::map_to_5(mos),
        ReportingScale::FourFive => scale::map_to_45(mos),
    }
}
