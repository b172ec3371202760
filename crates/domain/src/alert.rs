//! Alerts and reservoir water-status classification.

use serde::{Deserialize, Serialize};

use crate::snapshot::SensorField;
use crate::thresholds::ThresholdSet;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
}

/// A condition flagged during rule evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    /// The sensor the alert was derived from.
    pub sensor: SensorField,
    /// The reading that triggered the alert.
    pub value: f64,
    /// True when the operator must act immediately.
    pub action_required: bool,
}

/// Priority attached to a water-status band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Reservoir level classification. Reporting only — never gates actuation.
///
/// The bands are exhaustive and mutually exclusive over the 0–100 percent
/// range: critical < low < adequate < optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterStatus {
    Critical,
    Low,
    Adequate,
    Optimal,
}

/// Level above which the reservoir is considered optimal (percent).
const OPTIMAL_ABOVE: f64 = 80.0;

impl WaterStatus {
    /// Classify a reservoir level against the given thresholds.
    #[must_use]
    pub fn classify(water_level: f64, thresholds: &ThresholdSet) -> Self {
        if water_level < thresholds.water_level_critical {
            Self::Critical
        } else if water_level < thresholds.water_level_min {
            Self::Low
        } else if water_level > OPTIMAL_ABOVE {
            Self::Optimal
        } else {
            Self::Adequate
        }
    }

    /// Operator priority for this band.
    #[must_use]
    pub fn priority(self) -> Priority {
        match self {
            Self::Critical => Priority::High,
            Self::Low => Priority::Medium,
            Self::Adequate | Self::Optimal => Priority::Low,
        }
    }

    /// Human-readable status message.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Critical => "Water level critically low, refill the tank immediately",
            Self::Low => "Water level low, schedule a tank refill",
            Self::Adequate => "Water level adequate",
            Self::Optimal => "Water level optimal",
        }
    }
}
