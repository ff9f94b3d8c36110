use serde::{Deserialize, Serialize};

use crate::DetectError;

/// Configuration for [`CannyZernikeDetector`](crate::CannyZernikeDetector).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyZernikeParams {
    /// Weak threshold as a fraction of the strong threshold.
    pub low_threshold_ratio: f32,
    /// Strong threshold as a fraction of the largest thinned response.
    pub high_threshold_ratio: f32,
    /// Run the Zernike subpixel pass after hysteresis.
    pub apply_subpixel: bool,
}

impl Default for CannyZernikeParams {
    fn default() -> Self {
        Self {
            low_threshold_ratio: 0.05,
            high_threshold_ratio: 0.15,
            apply_subpixel: true,
        }
    }
}

impl CannyZernikeParams {
    /// Build parameters from thresholds given either as ratios or on the
    /// 0–255 intensity scale.
    ///
    /// When `high > 1` both values are read as intensities and divided by
    /// 255; otherwise they are used as ratios unchanged.
    pub fn from_thresholds(low: f32, high: f32) -> Self {
        let (low_threshold_ratio, high_threshold_ratio) = if high > 1.0 {
            (low / 255.0, high / 255.0)
        } else {
            (low, high)
        };
        Self {
            low_threshold_ratio,
            high_threshold_ratio,
            ..Self::default()
        }
    }

    pub fn with_subpixel(mut self, apply_subpixel: bool) -> Self {
        self.apply_subpixel = apply_subpixel;
        self
    }

    /// Check `0 < low < high < 1`.
    pub fn validate(&self) -> Result<(), DetectError> {
        let low = self.low_threshold_ratio;
        let high = self.high_threshold_ratio;
        let ordered = low > 0.0 && low < high && high < 1.0;
        if ordered {
            Ok(())
        } else {
            Err(DetectError::InvalidThresholds { low, high })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn intensity_thresholds_are_normalized() {
        let p = CannyZernikeParams::from_thresholds(50.0, 150.0);
        assert_relative_eq!(p.low_threshold_ratio, 50.0 / 255.0);
        assert_relative_eq!(p.high_threshold_ratio, 150.0 / 255.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn ratio_thresholds_pass_through() {
        let p = CannyZernikeParams::from_thresholds(0.1, 0.3);
        assert_eq!(p.low_threshold_ratio, 0.1);
        assert_eq!(p.high_threshold_ratio, 0.3);
    }

    #[test]
    fn validate_rejects_bad_ordering_and_range() {
        for (low, high) in [(0.2, 0.1), (0.0, 0.5), (0.1, 1.0), (0.3, 0.3), (f32::NAN, 0.5)] {
            let p = CannyZernikeParams {
                low_threshold_ratio: low,
                high_threshold_ratio: high,
                ..CannyZernikeParams::default()
            };
            assert!(
                matches!(p.validate(), Err(DetectError::InvalidThresholds { .. })),
                "low={low} high={high}"
            );
        }
    }

    #[test]
    fn missing_fields_take_defaults() {
        let p: CannyZernikeParams = serde_json::from_str(r#"{"apply_subpixel": false}"#).unwrap();
        assert_eq!(p.low_threshold_ratio, 0.05);
        assert_eq!(p.high_threshold_ratio, 0.15);
        assert!(!p.apply_subpixel);
    }
}
