//! Sensor snapshot — one simultaneous set of readings for a device.
//!
//! Every reading is an explicit "value or unknown". Accessors substitute a
//! documented worst-case value for missing readings: absence of data is
//! treated as "needs attention", never as "assume fine". For every field the
//! worst case is `0.0` — zero moisture demands irrigation, zero light turns
//! the lamps on, and zero water level gates the pumps off and raises the
//! critical refill alert.

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;
use crate::time::Timestamp;

/// Worst-case value substituted for a missing reading.
const ASSUMED_WORST: f64 = 0.0;

/// The snapshot fields a sensor or actuator can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorField {
    Temperature,
    Humidity,
    Light,
    Moisture,
    WaterLevel,
    Ec,
    Ppm,
}

impl SensorField {
    /// Stable lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Light => "light",
            Self::Moisture => "moisture",
            Self::WaterLevel => "water_level",
            Self::Ec => "ec",
            Self::Ppm => "ppm",
        }
    }
}

impl std::fmt::Display for SensorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simultaneous set of sensor readings for a device.
///
/// Produced fresh each tick and persisted by the storage collaborator;
/// the core never retains snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub device_id: DeviceId,
    /// Air temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// Illuminance in lux.
    pub light: Option<f64>,
    /// Substrate moisture in percent.
    pub moisture: Option<f64>,
    /// Reservoir water level in percent (0–100).
    pub water_level: Option<f64>,
    /// Electrical conductivity of the nutrient solution in mS/cm.
    pub ec: Option<f64>,
    /// Total dissolved solids in ppm.
    pub ppm: Option<f64>,
    pub recorded_at: Timestamp,
}

impl SensorSnapshot {
    /// An empty snapshot (every reading unknown) recorded now.
    #[must_use]
    pub fn empty(device_id: DeviceId) -> Self {
        Self {
            device_id,
            temperature: None,
            humidity: None,
            light: None,
            moisture: None,
            water_level: None,
            ec: None,
            ppm: None,
            recorded_at: crate::time::now(),
        }
    }

    /// Read a field by name.
    #[must_use]
    pub fn get(&self, field: SensorField) -> Option<f64> {
        match field {
            SensorField::Temperature => self.temperature,
            SensorField::Humidity => self.humidity,
            SensorField::Light => self.light,
            SensorField::Moisture => self.moisture,
            SensorField::WaterLevel => self.water_level,
            SensorField::Ec => self.ec,
            SensorField::Ppm => self.ppm,
        }
    }

    /// Moisture, assuming bone-dry substrate (`0.0`) when unknown.
    #[must_use]
    pub fn moisture_or_assumed(&self) -> f64 {
        self.moisture.unwrap_or(ASSUMED_WORST)
    }

    /// Light, assuming darkness (`0.0`) when unknown.
    #[must_use]
    pub fn light_or_assumed(&self) -> f64 {
        self.light.unwrap_or(ASSUMED_WORST)
    }

    /// Temperature, assuming `0.0` °C when unknown. An unknown temperature
    /// therefore never trips the over-temperature fan rule.
    #[must_use]
    pub fn temperature_or_assumed(&self) -> f64 {
        self.temperature.unwrap_or(ASSUMED_WORST)
    }

    /// Water level, assuming an empty reservoir (`0.0`) when unknown. An
    /// unknown level gates irrigation off and raises the critical alert.
    #[must_use]
    pub fn water_level_or_assumed(&self) -> f64 {
        self.water_level.unwrap_or(ASSUMED_WORST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_assume_worst_case_for_missing_readings() {
        let snapshot = SensorSnapshot::empty(DeviceId::new());
        assert_eq!(snapshot.moisture_or_assumed(), 0.0);
        assert_eq!(snapshot.light_or_assumed(), 0.0);
        assert_eq!(snapshot.temperature_or_assumed(), 0.0);
        assert_eq!(snapshot.water_level_or_assumed(), 0.0);
    }

    #[test]
    fn should_return_actual_reading_when_present() {
        let snapshot = SensorSnapshot {
            moisture: Some(42.5),
            ..SensorSnapshot::empty(DeviceId::new())
        };
        assert_eq!(snapshot.moisture_or_assumed(), 42.5);
        assert_eq!(snapshot.get(SensorField::Moisture), Some(42.5));
        assert_eq!(snapshot.get(SensorField::Ec), None);
    }

    #[test]
    fn should_serialize_field_names_as_snake_case() {
        let json = serde_json::to_string(&SensorField::WaterLevel).unwrap();
        assert_eq!(json, "\"water_level\"");
    }
}
