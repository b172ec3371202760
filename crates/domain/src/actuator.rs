//! Actuator — a controllable output owned by exactly one device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GrowHubError, ValidationError};
use crate::id::{ActuatorId, DeviceId};

/// The closed set of actuator kinds growhub can drive.
///
/// Dispatch on this enum replaces the string-typed actuator dispatch of
/// earlier firmware: every rule table matches exhaustively, so adding a
/// variant forces every decision site to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorKind {
    /// Irrigation pump.
    Pump,
    /// Grow light.
    Light,
    /// Ventilation fan.
    Fan,
    /// Secondary distribution pump drawing from the main reservoir.
    WaterPump,
    /// Irrigation valve.
    Valve,
    /// Nutrient dosing pump (no automation rule yet).
    NutrientPump,
}

impl ActuatorKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Pump,
        Self::Light,
        Self::Fan,
        Self::WaterPump,
        Self::Valve,
        Self::NutrientPump,
    ];

    /// Kinds switched off by an emergency stop.
    pub const EMERGENCY_STOP: [Self; 4] = [Self::Pump, Self::Light, Self::Fan, Self::WaterPump];

    /// Stable lowercase label, used in state keys and storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pump => "pump",
            Self::Light => "light",
            Self::Fan => "fan",
            Self::WaterPump => "water_pump",
            Self::Valve => "valve",
            Self::NutrientPump => "nutrient_pump",
        }
    }
}

impl fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActuatorKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pump" => Ok(Self::Pump),
            "light" => Ok(Self::Light),
            "fan" => Ok(Self::Fan),
            "water_pump" => Ok(Self::WaterPump),
            "valve" => Ok(Self::Valve),
            "nutrient_pump" => Ok(Self::NutrientPump),
            other => Err(ValidationError::UnknownActuatorKind(other.to_string())),
        }
    }
}

/// A controllable output (pump, light, fan, valve, …) wired to one device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actuator {
    pub id: ActuatorId,
    /// Owning device; an actuator is never shared across devices.
    pub device_id: DeviceId,
    pub kind: ActuatorKind,
    /// Physical port label on the controller board (e.g. `"D6"`).
    pub port: String,
    /// Optional human label like `"Pump B - Zone 2"`.
    pub name: Option<String>,
    /// Inactive actuators are skipped by resolution and automation.
    pub active: bool,
    /// State applied when the process boots and primes the state store.
    pub default_state: bool,
    /// Optional label binding this actuator to one snapshot field
    /// (e.g. `"moisture_zone2"`). Provisioning metadata only.
    pub sensor_key: Option<String>,
}

impl Actuator {
    /// Create a builder for constructing an [`Actuator`].
    #[must_use]
    pub fn builder() -> ActuatorBuilder {
        ActuatorBuilder::default()
    }

    /// Display label: the name if set, otherwise the kind.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.kind.as_str())
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::Validation`] when `port` is empty.
    pub fn validate(&self) -> Result<(), GrowHubError> {
        if self.port.is_empty() {
            return Err(ValidationError::EmptyPort.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Actuator`].
#[derive(Debug, Default)]
pub struct ActuatorBuilder {
    id: Option<ActuatorId>,
    device_id: Option<DeviceId>,
    kind: Option<ActuatorKind>,
    port: Option<String>,
    name: Option<String>,
    active: Option<bool>,
    default_state: Option<bool>,
    sensor_key: Option<String>,
}

impl ActuatorBuilder {
    #[must_use]
    pub fn id(mut self, id: ActuatorId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: ActuatorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub fn default_state(mut self, default_state: bool) -> Self {
        self.default_state = Some(default_state);
        self
    }

    #[must_use]
    pub fn sensor_key(mut self, sensor_key: impl Into<String>) -> Self {
        self.sensor_key = Some(sensor_key.into());
        self
    }

    /// Consume the builder, validate, and return an [`Actuator`].
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::Validation`] if `port` is missing or empty.
    pub fn build(self) -> Result<Actuator, GrowHubError> {
        let actuator = Actuator {
            id: self.id.unwrap_or_default(),
            device_id: self.device_id.unwrap_or_default(),
            kind: self.kind.unwrap_or(ActuatorKind::Pump),
            port: self.port.unwrap_or_default(),
            name: self.name,
            active: self.active.unwrap_or(true),
            default_state: self.default_state.unwrap_or(false),
            sensor_key: self.sensor_key,
        };
        actuator.validate()?;
        Ok(actuator)
    }
}
