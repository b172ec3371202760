//! Threshold sets — the numeric bounds driving actuation and alerts.
//!
//! A complete [`ThresholdSet`] with every key populated always exists at
//! process level. Devices may carry a partial [`ThresholdOverride`] that is
//! merged key-by-key over the defaults; the merge can never produce a gap
//! because the base set is complete by construction.

use serde::{Deserialize, Serialize};

use crate::error::{GrowHubError, ValidationError};

/// Complete set of automation thresholds. Every key is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Irrigate below this substrate moisture (percent).
    pub moisture_min: f64,
    /// Turn lights on below this illuminance (lux).
    pub light_min: f64,
    /// Run the fan above this temperature (°C).
    pub temperature_max: f64,
    /// Minimum reservoir level (percent) for irrigation to run.
    pub water_level_min: f64,
    /// Below this reservoir level (percent) the refill alert is critical.
    pub water_level_critical: f64,
    /// Nutrient solution EC lower bound (mS/cm). Reserved for dosing.
    pub ec_min: f64,
    /// Nutrient solution EC upper bound (mS/cm). Reserved for dosing.
    pub ec_max: f64,
    /// Dissolved solids lower bound (ppm). Reserved for dosing.
    pub ppm_min: f64,
    /// Dissolved solids upper bound (ppm). Reserved for dosing.
    pub ppm_max: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            moisture_min: 30.0,
            light_min: 300.0,
            temperature_max: 28.0,
            water_level_min: 20.0,
            water_level_critical: 10.0,
            ec_min: 1.2,
            ec_max: 2.5,
            ppm_min: 800.0,
            ppm_max: 1500.0,
        }
    }
}

impl ThresholdSet {
    /// Merge a partial override over this set, key by key.
    ///
    /// Keys present in the override win; missing keys keep the base value.
    #[must_use]
    pub fn merged(&self, over: &ThresholdOverride) -> Self {
        Self {
            moisture_min: over.moisture_min.unwrap_or(self.moisture_min),
            light_min: over.light_min.unwrap_or(self.light_min),
            temperature_max: over.temperature_max.unwrap_or(self.temperature_max),
            water_level_min: over.water_level_min.unwrap_or(self.water_level_min),
            water_level_critical: over
                .water_level_critical
                .unwrap_or(self.water_level_critical),
            ec_min: over.ec_min.unwrap_or(self.ec_min),
            ec_max: over.ec_max.unwrap_or(self.ec_max),
            ppm_min: over.ppm_min.unwrap_or(self.ppm_min),
            ppm_max: over.ppm_max.unwrap_or(self.ppm_max),
        }
    }

    /// Merge an optional override, returning a clone of the base when absent.
    #[must_use]
    pub fn merged_opt(&self, over: Option<&ThresholdOverride>) -> Self {
        match over {
            Some(over) => self.merged(over),
            None => self.clone(),
        }
    }
}

/// Partial threshold map: a patch or a per-device override.
///
/// Unknown keys are rejected at deserialization so a malformed patch fails
/// fast instead of being silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moisture_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_level_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_level_critical: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ec_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ppm_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ppm_max: Option<f64>,
}

impl ThresholdOverride {
    /// True when no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check that every present value is a finite, non-negative number.
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::Validation`] naming the first offending key.
    pub fn validate(&self) -> Result<(), GrowHubError> {
        let fields = [
            ("moisture_min", self.moisture_min),
            ("light_min", self.light_min),
            ("temperature_max", self.temperature_max),
            ("water_level_min", self.water_level_min),
            ("water_level_critical", self.water_level_critical),
            ("ec_min", self.ec_min),
            ("ec_max", self.ec_max),
            ("ppm_min", self.ppm_min),
            ("ppm_max", self.ppm_max),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::InvalidThreshold { field }.into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_base_values_for_missing_override_keys() {
        let base = ThresholdSet::default();
        let over = ThresholdOverride {
            moisture_min: Some(45.0),
            ..ThresholdOverride::default()
        };

        let merged = base.merged(&over);
        assert_eq!(merged.moisture_min, 45.0);
        assert_eq!(merged.light_min, base.light_min);
        assert_eq!(merged.water_level_critical, base.water_level_critical);
    }

    #[test]
    fn should_return_base_clone_when_override_absent() {
        let base = ThresholdSet::default();
        assert_eq!(base.merged_opt(None), base);
    }

    #[test]
    fn should_prefer_every_override_key_when_all_present() {
        let base = ThresholdSet::default();
        let over = ThresholdOverride {
            moisture_min: Some(1.0),
            light_min: Some(2.0),
            temperature_max: Some(3.0),
            water_level_min: Some(4.0),
            water_level_critical: Some(5.0),
            ec_min: Some(6.0),
            ec_max: Some(7.0),
            ppm_min: Some(8.0),
            ppm_max: Some(9.0),
        };

        let merged = base.merged(&over);
        assert_eq!(merged.moisture_min, 1.0);
        assert_eq!(merged.ppm_max, 9.0);
    }

    #[test]
    fn should_reject_negative_threshold_value() {
        let over = ThresholdOverride {
            light_min: Some(-1.0),
            ..ThresholdOverride::default()
        };
        assert!(matches!(
            over.validate(),
            Err(GrowHubError::Validation(
                ValidationError::InvalidThreshold { field: "light_min" }
            ))
        ));
    }

    #[test]
    fn should_reject_non_finite_threshold_value() {
        let over = ThresholdOverride {
            ppm_max: Some(f64::NAN),
            ..ThresholdOverride::default()
        };
        assert!(over.validate().is_err());
    }

    #[test]
    fn should_reject_unknown_keys_when_deserializing() {
        let result: Result<ThresholdOverride, _> =
            serde_json::from_str(r#"{"moisture_minimum": 30}"#);
        assert!(result.is_err());
    }

    #[test]
    fn should_report_empty_override() {
        assert!(ThresholdOverride::default().is_empty());
        let over = ThresholdOverride {
            ec_min: Some(1.0),
            ..ThresholdOverride::default()
        };
        assert!(!over.is_empty());
    }
}
