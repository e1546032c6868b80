//! High-level prediction options.

use quale_core::{DeviceType, Resolution};
use quale_features::FeatureCache;
use quale_model::{
    DeviceProfile, ModelCoefficients, ModelVariant, Predictor, ReportingScale, ViewingDistance,
};
use std::path::PathBuf;

/// Options for the one-call prediction API.
#[derive(Debug, Clone)]
pub struct PredictOptions {
    pub variant: ModelVariant,
    pub device_type: DeviceType,
    pub device_resolution: Resolution,
    pub viewing_distance: ViewingDistance,
    pub display_size: f64,
    pub reporting: ReportingScale,
    pub coefficients: ModelCoefficients,
    /// Feature cache directory; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            variant: ModelVariant::Coarse,
            device_type: DeviceType::Pc,
            device_resolution: Resolution::new(3840, 2160),
            viewing_distance: ViewingDistance::default(),
            display_size: 55.0,
            reporting: ReportingScale::default(),
            coefficients: ModelCoefficients::builtin(),
            cache_dir: None,
        }
    }
}

impl PredictOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variant(mut self, variant: ModelVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    pub fn device_resolution(mut self, resolution: Resolution) -> Self {
        self.device_resolution = resolution;
        self
    }

    pub fn viewing_distance(mut self, distance: ViewingDistance) -> Self {
        self.viewing_distance = distance;
        self
    }

    pub fn display_size(mut self, inches: f64) -> Self {
        self.display_size = inches;
        self
    }

    pub fn reporting(mut self, reporting: ReportingScale) -> Self {
        self.reporting = reporting;
        self
    }

    pub fn coefficients(mut self, coefficients: ModelCoefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Build the sequence predictor these options describe.
    pub fn predictor(&self) -> Predictor {
        let device = DeviceProfile::new(self.device_type, self.device_resolution)
            .with_viewing_distance(self.viewing_distance)
            .with_display_size(self.display_size);
        Predictor::new(self.variant, device, self.coefficients.clone())
            .with_reporting(self.reporting)
    }

    /// Open the feature cache, if one is configured.
    pub fn open_cache(&self) -> quale_core::Result<Option<FeatureCache>> {
        match &self.cache_dir {
            Some(dir) => Ok(Some(FeatureCache::new(dir.clone()).map_err(
                quale_core::Error::from,
            )?)),
            None => Ok(None),
        }
    }

    /// Model name recorded in reports.
    pub fn model_name(&self) -> String {
        self.variant.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let options = PredictOptions::new()
            .variant(ModelVariant::Refined)
            .device_type(DeviceType::Mobile)
            .device_resolution(Resolution::new(1920, 1080))
            .display_size(32.0);

        assert_eq!(options.variant, ModelVariant::Refined);
        assert_eq!(options.device_type, DeviceType::Mobile);
        assert_eq!(options.device_resolution.pixels(), 2_073_600);

        let predictor = options.predictor();
        assert_eq!(predictor.variant(), ModelVariant::Refined);
        assert_eq!(predictor.device().display_size, 32.0);
    }

    #[test]
    fn test_no_cache_by_default() {
        assert!(PredictOptions::default().open_cache().unwrap().is_none());
    }
}
