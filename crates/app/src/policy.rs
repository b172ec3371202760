//! Threshold policy — pure rule evaluation over one sensor snapshot.
//!
//! `evaluate` turns a snapshot, a threshold set, and the actuators in scope
//! into per-actuator decisions, operator alerts, and a water-status
//! classification. It has no side effects and is total: missing snapshot
//! fields fall back to their documented worst-case values, so evaluation
//! never errors.
//!
//! Threshold resolution is layered. A request-level override (if any) is
//! merged over the process defaults first; each actuator then resolves its
//! *own* set from its owning device's override, falling back to the already
//! overridden request-level set. Independently provisioned zones therefore
//! run independent rules against the same snapshot.

use std::collections::HashMap;

use growhub_domain::actuator::{Actuator, ActuatorKind};
use growhub_domain::alert::{Alert, Severity, WaterStatus};
use growhub_domain::decision::ActuationDecision;
use growhub_domain::id::DeviceId;
use growhub_domain::snapshot::{SensorField, SensorSnapshot};
use growhub_domain::thresholds::{ThresholdOverride, ThresholdSet};

/// The complete result of one policy evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// One decision per recognized, active actuator.
    pub decisions: Vec<ActuationDecision>,
    /// Operator alerts derived from the request-level thresholds.
    pub alerts: Vec<Alert>,
    /// Reservoir classification; reporting only, never gates decisions.
    pub water_status: WaterStatus,
}

/// Evaluate a snapshot against thresholds and the actuators in scope.
///
/// `overrides` is an optional request-level patch merged over `thresholds`
/// before anything else. `device_overrides` maps a device to its
/// provisioned override; actuators whose device is absent from the map use
/// the request-level set as-is. Inactive actuators and kinds with no rule
/// are omitted from `decisions` — neither is an error.
#[must_use]
pub fn evaluate(
    snapshot: &SensorSnapshot,
    thresholds: &ThresholdSet,
    overrides: Option<&ThresholdOverride>,
    actuators: &[Actuator],
    device_overrides: &HashMap<DeviceId, ThresholdOverride>,
) -> Evaluation {
    let top = thresholds.merged_opt(overrides);

    let mut decisions = Vec::new();
    for actuator in actuators.iter().filter(|a| a.active) {
        let resolved = match device_overrides.get(&actuator.device_id) {
            Some(over) => top.merged(over),
            None => top.clone(),
        };
        if let Some(on) = desired_state(actuator.kind, snapshot, &resolved) {
            decisions.push(ActuationDecision {
                actuator_id: actuator.id,
                kind: actuator.kind,
                on,
                thresholds: resolved,
            });
        }
    }

    Evaluation {
        decisions,
        alerts: water_alerts(snapshot, &top),
        water_status: WaterStatus::classify(snapshot.water_level_or_assumed(), &top),
    }
}

/// The per-kind decision rule. `None` means the kind has no automation rule
/// and is omitted from the decision list.
///
/// The reservoir guard on pump and valve takes precedence over moisture:
/// irrigation never runs when the supply is below the minimum, regardless
/// of how dry the substrate reads.
#[must_use]
pub fn desired_state(
    kind: ActuatorKind,
    snapshot: &SensorSnapshot,
    thresholds: &ThresholdSet,
) -> Option<bool> {
    let moisture = snapshot.moisture_or_assumed();
    let water_level = snapshot.water_level_or_assumed();
    match kind {
        ActuatorKind::Pump | ActuatorKind::Valve => {
            Some(moisture < thresholds.moisture_min && water_level >= thresholds.water_level_min)
        }
        ActuatorKind::Light => Some(snapshot.light_or_assumed() < thresholds.light_min),
        ActuatorKind::Fan => Some(snapshot.temperature_or_assumed() > thresholds.temperature_max),
        // Secondary distribution pump: runs only while the main reservoir
        // holds more than the irrigation minimum.
        ActuatorKind::WaterPump => Some(water_level > thresholds.water_level_min),
        ActuatorKind::NutrientPump => None,
    }
}

/// Reservoir alerts, computed once against the request-level thresholds.
fn water_alerts(snapshot: &SensorSnapshot, thresholds: &ThresholdSet) -> Vec<Alert> {
    let water_level = snapshot.water_level_or_assumed();
    let moisture = snapshot.moisture_or_assumed();
    let mut alerts = Vec::new();

    if water_level < thresholds.water_level_critical {
        alerts.push(Alert {
            severity: Severity::Critical,
            message: "Immediate water tank refill required".to_string(),
            sensor: SensorField::WaterLevel,
            value: water_level,
            action_required: true,
        });
    } else if water_level < thresholds.water_level_min {
        alerts.push(Alert {
            severity: Severity::Warning,
            message: "Schedule water tank refill".to_string(),
            sensor: SensorField::WaterLevel,
            value: water_level,
            action_required: false,
        });
    }

    // Independent compound check: the substrate needs water but the
    // reservoir cannot supply it.
    if moisture < thresholds.moisture_min && water_level < thresholds.water_level_min {
        alerts.push(Alert {
            severity: Severity::Warning,
            message: "Moisture low but water level insufficient, cannot irrigate".to_string(),
            sensor: SensorField::Moisture,
            value: moisture,
            action_required: false,
        });
    }

    alerts
}
