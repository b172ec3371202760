//! Actuation decisions — the transient output of rule evaluation.

use serde::{Deserialize, Serialize};

use crate::actuator::ActuatorKind;
use crate::id::ActuatorId;
use crate::thresholds::ThresholdSet;

/// A single per-actuator decision produced by the threshold policy.
///
/// Decisions are handed to the orchestrator and discarded once applied;
/// the audit log is the durable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuationDecision {
    pub actuator_id: ActuatorId,
    pub kind: ActuatorKind,
    /// Desired on/off state.
    pub on: bool,
    /// The fully-merged threshold set the decision was evaluated against.
    pub thresholds: ThresholdSet,
}
