//! State store — the in-memory convergence cache.
//!
//! Maps an actuation target to the last state the orchestrator applied, so
//! the scheduler can skip redundant hardware writes. It is **not** the
//! source of truth for physical hardware state: every tick re-derives the
//! desired state from sensor readings, so the cache is safe to reset on
//! restart.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Mutex, PoisonError};

use growhub_domain::actuator::{Actuator, ActuatorKind};
use growhub_domain::id::DeviceId;

/// Composed string key scoping an actuation target.
///
/// Three scopes exist, from legacy to most specific:
/// `{kind}` (single-actuator mode), `{kind}_{device}`, and
/// `{kind}_{device}_{port}` (several actuators of one kind on one device).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(String);

impl StateKey {
    /// Unscoped key for the legacy single-actuator-per-kind mode.
    #[must_use]
    pub fn unscoped(kind: ActuatorKind) -> Self {
        Self(kind.as_str().to_string())
    }

    /// Key scoped to one device.
    #[must_use]
    pub fn device(kind: ActuatorKind, device_id: DeviceId) -> Self {
        Self(format!("{kind}_{device_id}"))
    }

    /// Key scoped to one port of one device.
    #[must_use]
    pub fn port(kind: ActuatorKind, device_id: DeviceId, port: &str) -> Self {
        Self(format!("{kind}_{device_id}_{port}"))
    }

    /// The fully-scoped key for a registered actuator.
    #[must_use]
    pub fn actuator(actuator: &Actuator) -> Self {
        Self::port(actuator.kind, actuator.device_id, &actuator.port)
    }

    /// The composed key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-wide last-applied actuation states, guarded by a mutex so manual
/// and scheduled actuation can touch the same target concurrently.
#[derive(Debug, Default)]
pub struct StateStore {
    states: Mutex<HashMap<StateKey, bool>>,
}

impl StateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-applied state for a target, or `None` when never applied.
    #[must_use]
    pub fn get(&self, key: &StateKey) -> Option<bool> {
        self.lock().get(key).copied()
    }

    /// Record an applied state, returning the previous one if any.
    pub fn set(&self, key: StateKey, on: bool) -> Option<bool> {
        self.lock().insert(key, on)
    }

    /// Drop all cached states. Used on restart; the next tick repopulates.
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Stable snapshot of every known target for reporting.
    #[must_use]
    pub fn dump(&self) -> BTreeMap<String, bool> {
        self.lock()
            .iter()
            .map(|(key, on)| (key.as_str().to_string(), *on))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StateKey, bool>> {
        // A poisoned lock only means another writer panicked mid-insert;
        // the map itself is still coherent for bool values.
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
