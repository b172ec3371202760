//! Device — a controller node owning zero or more actuators.

use serde::{Deserialize, Serialize};

use crate::error::{GrowHubError, ValidationError};
use crate::id::DeviceId;
use crate::thresholds::ThresholdOverride;

/// A controller node (typically an ESP32 board) reporting sensor readings
/// and owning the actuators wired to its ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Stable external identifier reported by the hardware (MAC, serial, …).
    pub external_id: String,
    pub name: String,
    /// Free-form location label, e.g. `"Greenhouse A"`.
    pub location: Option<String>,
    /// Free-form device kind, e.g. `"controller"`.
    pub kind: Option<String>,
    /// Inactive devices are skipped by the collection pipeline.
    pub active: bool,
    /// Optional per-device threshold override, merged key-by-key over the
    /// process defaults when evaluating this device's actuators.
    pub thresholds: Option<ThresholdOverride>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::Validation`] when `name` or `external_id`
    /// is empty, or when the threshold override contains invalid numbers.
    pub fn validate(&self) -> Result<(), GrowHubError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.external_id.is_empty() {
            return Err(ValidationError::EmptyExternalId.into());
        }
        if let Some(thresholds) = &self.thresholds {
            thresholds.validate()?;
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    external_id: Option<String>,
    name: Option<String>,
    location: Option<String>,
    kind: Option<String>,
    active: Option<bool>,
    thresholds: Option<ThresholdOverride>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn thresholds(mut self, thresholds: ThresholdOverride) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::Validation`] if required fields are missing
    /// or the threshold override is invalid.
    pub fn build(self) -> Result<Device, GrowHubError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            external_id: self.external_id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            location: self.location,
            kind: self.kind,
            active: self.active.unwrap_or(true),
            thresholds: self.thresholds,
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_valid_device_when_required_fields_provided() {
        let device = Device::builder()
            .name("Greenhouse Pump Controller")
            .external_id("esp32-a4c138")
            .location("Greenhouse A")
            .build()
            .unwrap();
        assert!(device.active);
        assert!(device.thresholds.is_none());
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Device::builder().external_id("esp32-a4c138").build();
        assert!(matches!(
            result,
            Err(GrowHubError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_external_id_is_empty() {
        let result = Device::builder().name("Controller").build();
        assert!(matches!(
            result,
            Err(GrowHubError::Validation(ValidationError::EmptyExternalId))
        ));
    }

    #[test]
    fn should_carry_threshold_override() {
        let device = Device::builder()
            .name("Zone 2")
            .external_id("esp32-zone2")
            .thresholds(ThresholdOverride {
                moisture_min: Some(45.0),
                ..ThresholdOverride::default()
            })
            .build()
            .unwrap();
        assert_eq!(device.thresholds.unwrap().moisture_min, Some(45.0));
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let device = Device::builder()
            .name("Controller")
            .external_id("esp32-1")
            .build()
            .unwrap();
        let json = serde_json::to_string(&device).unwrap();
        let parsed: Device = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, device.id);
        assert_eq!(parsed.external_id, device.external_id);
    }
}
