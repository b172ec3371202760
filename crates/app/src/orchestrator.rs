//! Actuator orchestration — applies actuation decisions to hardware.
//!
//! The orchestrator resolves the concrete actuators behind a target, updates
//! the state store, emits the fire-and-forget hardware write, and appends an
//! audit entry for every applied change. Manual (API-triggered) and
//! scheduled actuation both run through it, sharing the same state store and
//! audit log.

use std::collections::HashMap;
use std::sync::Arc;

use growhub_domain::actuator::{Actuator, ActuatorKind};
use growhub_domain::audit::{ActuationSource, AuditEntry};
use growhub_domain::decision::ActuationDecision;
use growhub_domain::error::{AuthorizationError, GrowHubError, NotFoundError};
use growhub_domain::id::{ActuatorId, DeviceId, PrincipalId};

use crate::ports::{ActuatorDriver, Authorization, Persistence};
use crate::state_store::{StateKey, StateStore};

/// The result of one applied actuation.
#[derive(Debug, Clone)]
pub struct ActuationOutcome {
    /// `None` on the unscoped fallback path.
    pub actuator_id: Option<ActuatorId>,
    /// The state-store key the write was recorded under.
    pub key: StateKey,
    /// Last known state before this write, if any.
    pub previous: Option<bool>,
    /// The state that was applied.
    pub state: bool,
}

/// Applies actuation decisions with auditing and convergence caching.
pub struct ActuatorOrchestrator<P, A, D> {
    persistence: P,
    authorization: A,
    driver: D,
    state: Arc<StateStore>,
}

impl<P, A, D> ActuatorOrchestrator<P, A, D>
where
    P: Persistence,
    A: Authorization,
    D: ActuatorDriver,
{
    /// Create a new orchestrator over the given collaborators.
    pub fn new(persistence: P, authorization: A, driver: D, state: Arc<StateStore>) -> Self {
        Self {
            persistence,
            authorization,
            driver,
            state,
        }
    }

    /// The shared state store handle.
    #[must_use]
    pub fn state(&self) -> &Arc<StateStore> {
        &self.state
    }

    /// Apply a desired state to every active actuator of `kind` on a device.
    ///
    /// When no matching actuator is registered the write falls back to the
    /// unscoped key and is still audited (with a null actuator id), so
    /// commands against unprovisioned hardware remain traceable.
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::Transient`] when the hardware write or the
    /// audit append fails.
    #[tracing::instrument(skip(self))]
    pub async fn apply(
        &self,
        device_id: DeviceId,
        kind: ActuatorKind,
        on: bool,
        source: ActuationSource,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        let actuators: Vec<Actuator> = self
            .persistence
            .load_actuators_for_device(device_id)
            .await?
            .into_iter()
            .filter(|a| a.kind == kind && a.active)
            .collect();

        if actuators.is_empty() {
            tracing::warn!(%device_id, %kind, "no actuator registered, using unscoped fallback");
            let outcome = self
                .write_target(
                    None,
                    kind,
                    StateKey::unscoped(kind),
                    on,
                    source,
                    Some("no actuator registered for target".to_string()),
                )
                .await?;
            return Ok(vec![outcome]);
        }

        let mut outcomes = Vec::with_capacity(actuators.len());
        for actuator in &actuators {
            let outcome = self
                .write_target(
                    Some(actuator),
                    kind,
                    StateKey::actuator(actuator),
                    on,
                    source,
                    None,
                )
                .await?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Apply a desired state on behalf of a principal.
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::Authorization`] when the device does not
    /// resolve under the principal's ownership, and any error of
    /// [`apply`](Self::apply).
    #[tracing::instrument(skip(self))]
    pub async fn apply_for_principal(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
        kind: ActuatorKind,
        on: bool,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.resolve_owned_device(device_id, principal_id).await?;
        self.apply(device_id, kind, on, ActuationSource::User).await
    }

    /// Drive a single actuator identified by id.
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::NotFound`] for an unknown actuator id,
    /// [`GrowHubError::Authorization`] when its device is not owned by the
    /// principal, and [`GrowHubError::Transient`] for write failures.
    #[tracing::instrument(skip(self))]
    pub async fn apply_actuator(
        &self,
        principal_id: PrincipalId,
        actuator_id: ActuatorId,
        on: bool,
    ) -> Result<ActuationOutcome, GrowHubError> {
        let actuator = self.persistence.load_actuator(actuator_id).await?.ok_or(
            GrowHubError::NotFound(NotFoundError {
                entity: "Actuator",
                id: actuator_id.to_string(),
            }),
        )?;
        self.resolve_owned_device(actuator.device_id, principal_id)
            .await?;

        self.write_target(
            Some(&actuator),
            actuator.kind,
            StateKey::actuator(&actuator),
            on,
            ActuationSource::User,
            None,
        )
        .await
    }

    /// Converge a device towards the scheduler's decisions.
    ///
    /// Decisions whose target already holds the desired state are skipped —
    /// the state store acts as a debounce so steady conditions produce no
    /// redundant hardware writes. Returns the number of writes applied.
    ///
    /// # Errors
    ///
    /// Propagates the first write or audit failure.
    #[tracing::instrument(skip(self, decisions), fields(decisions = decisions.len()))]
    pub async fn converge(
        &self,
        device_id: DeviceId,
        decisions: &[ActuationDecision],
        source: ActuationSource,
    ) -> Result<usize, GrowHubError> {
        let actuators: HashMap<ActuatorId, Actuator> = self
            .persistence
            .load_actuators_for_device(device_id)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let mut applied = 0;
        for decision in decisions {
            let Some(actuator) = actuators.get(&decision.actuator_id) else {
                tracing::warn!(actuator_id = %decision.actuator_id, "decision for unknown actuator, skipping");
                continue;
            };
            let key = StateKey::actuator(actuator);
            if self.state.get(&key) == Some(decision.on) {
                tracing::debug!(target = %key, "no change, remains {}", decision.on);
                continue;
            }
            self.write_target(Some(actuator), decision.kind, key, decision.on, source, None)
                .await?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Best-effort emergency stop: switch off every pump, light, fan, and
    /// water pump on every device the principal owns.
    ///
    /// Failures are caught and logged per target so one failing actuator
    /// never prevents the others from being stopped. Returns the devices
    /// that were processed.
    ///
    /// # Errors
    ///
    /// Only the initial device listing can fail; per-actuator errors are
    /// swallowed.
    #[tracing::instrument(skip(self))]
    pub async fn emergency_stop(
        &self,
        principal_id: PrincipalId,
    ) -> Result<Vec<DeviceId>, GrowHubError> {
        tracing::warn!(%principal_id, "emergency stop activated, switching all actuators off");
        let devices = self.authorization.devices_for_principal(principal_id).await?;

        for device in &devices {
            for kind in ActuatorKind::EMERGENCY_STOP {
                if let Err(err) = self
                    .apply(device.id, kind, false, ActuationSource::System)
                    .await
                {
                    tracing::warn!(device_id = %device.id, %kind, error = %err, "failed to stop actuator");
                }
            }
        }
        Ok(devices.into_iter().map(|d| d.id).collect())
    }

    /// Prime the state store with every active actuator's boot default.
    ///
    /// Called once at startup; no audit entries are written since nothing
    /// is actuated.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the device or actuator lookups.
    pub async fn prime(&self) -> Result<usize, GrowHubError> {
        let mut primed = 0;
        for device in self.persistence.load_active_devices().await? {
            for actuator in self.persistence.load_actuators_for_device(device.id).await? {
                if actuator.active {
                    self.state
                        .set(StateKey::actuator(&actuator), actuator.default_state);
                    primed += 1;
                }
            }
        }
        tracing::info!(primed, "state store primed with actuator boot defaults");
        Ok(primed)
    }

    // ── Typed convenience wrappers ─────────────────────────────────

    /// Turn the irrigation pump(s) of a device on.
    pub async fn pump_on(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::Pump, true)
            .await
    }

    /// Turn the irrigation pump(s) of a device off.
    pub async fn pump_off(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::Pump, false)
            .await
    }

    /// Turn the grow light(s) of a device on.
    pub async fn light_on(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::Light, true)
            .await
    }

    /// Turn the grow light(s) of a device off.
    pub async fn light_off(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::Light, false)
            .await
    }

    /// Turn the ventilation fan(s) of a device on.
    pub async fn fan_on(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::Fan, true)
            .await
    }

    /// Turn the ventilation fan(s) of a device off.
    pub async fn fan_off(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::Fan, false)
            .await
    }

    /// Turn the distribution water pump(s) of a device on.
    pub async fn water_pump_on(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::WaterPump, true)
            .await
    }

    /// Turn the distribution water pump(s) of a device off.
    pub async fn water_pump_off(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::WaterPump, false)
            .await
    }

    /// Open the irrigation valve(s) of a device.
    pub async fn valve_open(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::Valve, true)
            .await
    }

    /// Close the irrigation valve(s) of a device.
    pub async fn valve_close(
        &self,
        principal_id: PrincipalId,
        device_id: DeviceId,
    ) -> Result<Vec<ActuationOutcome>, GrowHubError> {
        self.apply_for_principal(principal_id, device_id, ActuatorKind::Valve, false)
            .await
    }

    // ── Internals ──────────────────────────────────────────────────

    async fn resolve_owned_device(
        &self,
        device_id: DeviceId,
        principal_id: PrincipalId,
    ) -> Result<(), GrowHubError> {
        match self
            .authorization
            .device_for_principal(device_id, principal_id)
            .await?
        {
            Some(_) => Ok(()),
            None => Err(AuthorizationError {
                device_id: device_id.to_string(),
                principal_id: principal_id.to_string(),
            }
            .into()),
        }
    }

    async fn write_target(
        &self,
        actuator: Option<&Actuator>,
        kind: ActuatorKind,
        key: StateKey,
        on: bool,
        source: ActuationSource,
        note: Option<String>,
    ) -> Result<ActuationOutcome, GrowHubError> {
        // The cache must only ever record states the hardware accepted, so
        // the driver write comes first; a failed write leaves the previous
        // entry intact and convergence retries on the next tick.
        let previous = self.state.get(&key);
        self.driver.write(actuator, kind, on)?;
        self.state.set(key.clone(), on);
        self.persistence
            .append_audit_entry(AuditEntry::record(
                actuator.map(|a| a.id),
                kind,
                on,
                source,
                note,
            ))
            .await?;
        tracing::info!(target = %key, state = on, %source, "actuator state applied");
        Ok(ActuationOutcome {
            actuator_id: actuator.map(|a| a.id),
            key,
            previous,
            state: on,
        })
    }
}
