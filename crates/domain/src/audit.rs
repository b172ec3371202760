//! Audit entries — immutable records of actuation events.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actuator::ActuatorKind;
use crate::id::{ActuatorId, AuditEntryId};
use crate::time::Timestamp;

/// Who initiated an actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuationSource {
    /// Manual API-triggered actuation.
    User,
    /// Internal operation such as emergency stop.
    System,
    /// The periodic collection pipeline.
    Scheduler,
}

impl ActuationSource {
    /// Stable lowercase label used in storage.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
            Self::Scheduler => "scheduler",
        }
    }
}

impl fmt::Display for ActuationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of a single actuation. Never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    /// `None` when no actuator was registered for the target (the unscoped
    /// fallback path still records the attempt for traceability).
    pub actuator_id: Option<ActuatorId>,
    /// Actuator kind the action addressed.
    pub action: ActuatorKind,
    /// Desired state that was applied.
    pub state: bool,
    pub source: ActuationSource,
    pub note: Option<String>,
    pub created_at: Timestamp,
}

impl AuditEntry {
    /// Record an actuation event, timestamped now.
    #[must_use]
    pub fn record(
        actuator_id: Option<ActuatorId>,
        action: ActuatorKind,
        state: bool,
        source: ActuationSource,
        note: Option<String>,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            actuator_id,
            action,
            state,
            source,
            note,
            created_at: crate::time::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_record_entry_with_fresh_id_and_timestamp() {
        let before = crate::time::now();
        let entry = AuditEntry::record(
            None,
            ActuatorKind::Pump,
            true,
            ActuationSource::Scheduler,
            None,
        );
        assert!(entry.actuator_id.is_none());
        assert!(entry.state);
        assert!(entry.created_at >= before);
    }

    #[test]
    fn should_keep_distinct_ids_across_entries() {
        let a = AuditEntry::record(None, ActuatorKind::Fan, false, ActuationSource::User, None);
        let b = AuditEntry::record(None, ActuatorKind::Fan, false, ActuationSource::User, None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn should_serialize_source_as_snake_case() {
        let json = serde_json::to_string(&ActuationSource::Scheduler).unwrap();
        assert_eq!(json, "\"scheduler\"");
        assert_eq!(ActuationSource::System.to_string(), "system");
    }
}
