//! The periodic collection pipeline: read sensors, persist, evaluate, act.
//!
//! One [`run_tick`](CollectionPipeline::run_tick) covers every active device.
//! Per-device failures are logged and contained so a single offline zone
//! never blocks collection for the rest.

use std::collections::HashMap;
use std::sync::Arc;

use growhub_domain::audit::ActuationSource;
use growhub_domain::device::Device;
use growhub_domain::error::GrowHubError;
use growhub_domain::id::DeviceId;
use growhub_domain::thresholds::ThresholdOverride;

use crate::orchestrator::ActuatorOrchestrator;
use crate::policy;
use crate::ports::{ActuatorDriver, Authorization, Persistence, SensorReader};
use crate::thresholds_handle::SharedThresholds;

/// Read-persist-evaluate-actuate loop over all active devices.
pub struct CollectionPipeline<S, P, A, D> {
    reader: S,
    persistence: P,
    orchestrator: Arc<ActuatorOrchestrator<P, A, D>>,
    thresholds: SharedThresholds,
}

impl<S, P, A, D> CollectionPipeline<S, P, A, D>
where
    S: SensorReader,
    P: Persistence,
    A: Authorization,
    D: ActuatorDriver,
{
    pub fn new(
        reader: S,
        persistence: P,
        orchestrator: Arc<ActuatorOrchestrator<P, A, D>>,
        thresholds: SharedThresholds,
    ) -> Self {
        Self {
            reader,
            persistence,
            orchestrator,
            thresholds,
        }
    }

    /// The shared threshold handle this pipeline evaluates against.
    #[must_use]
    pub fn thresholds(&self) -> &SharedThresholds {
        &self.thresholds
    }

    /// Run one collection pass over every active device.
    ///
    /// Device-level errors are logged, not propagated; the tick itself only
    /// fails when the device listing does.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the active-device lookup.
    #[tracing::instrument(skip(self))]
    pub async fn run_tick(&self) -> Result<(), GrowHubError> {
        let devices = self.persistence.load_active_devices().await?;
        if devices.is_empty() {
            tracing::warn!("no active devices, nothing to collect");
            return Ok(());
        }

        for device in devices {
            if let Err(err) = self.process_device(&device).await {
                tracing::error!(device_id = %device.id, error = %err, "device collection failed");
            }
        }
        Ok(())
    }

    async fn process_device(&self, device: &Device) -> Result<(), GrowHubError> {
        let snapshot = self.reader.read(device).await?;
        self.persistence.save_snapshot(snapshot.clone()).await?;

        let actuators = self
            .persistence
            .load_actuators_for_device(device.id)
            .await?;
        let mut device_overrides: HashMap<DeviceId, ThresholdOverride> = HashMap::new();
        if let Some(over) = self
            .persistence
            .load_device_threshold_override(device.id)
            .await?
        {
            device_overrides.insert(device.id, over);
        }

        let thresholds = self.thresholds.current();
        let evaluation =
            policy::evaluate(&snapshot, &thresholds, None, &actuators, &device_overrides);

        for alert in &evaluation.alerts {
            match alert.severity {
                growhub_domain::alert::Severity::Critical => {
                    tracing::error!(
                        device_id = %device.id,
                        sensor = ?alert.sensor,
                        value = alert.value,
                        "{}", alert.message
                    );
                }
                growhub_domain::alert::Severity::Warning => {
                    tracing::warn!(
                        device_id = %device.id,
                        sensor = ?alert.sensor,
                        value = alert.value,
                        "{}", alert.message
                    );
                }
            }
        }
        tracing::debug!(
            device_id = %device.id,
            water_status = ?evaluation.water_status,
            decisions = evaluation.decisions.len(),
            "snapshot evaluated"
        );

        let applied = self
            .orchestrator
            .converge(device.id, &evaluation.decisions, ActuationSource::Scheduler)
            .await?;
        if applied > 0 {
            tracing::info!(device_id = %device.id, applied, "actuation applied from collection tick");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use growhub_domain::actuator::{Actuator, ActuatorKind};
    use growhub_domain::audit::AuditEntry;
    use growhub_domain::id::ActuatorId;
    use growhub_domain::snapshot::SensorSnapshot;

    use crate::state_store::{StateKey, StateStore};

    #[derive(Default)]
    struct InMemoryPersistence {
        devices: Mutex<Vec<Device>>,
        actuators: Mutex<Vec<Actuator>>,
        audit: Mutex<Vec<AuditEntry>>,
        snapshots: Mutex<Vec<SensorSnapshot>>,
    }

    impl Persistence for InMemoryPersistence {
        fn save_snapshot(
            &self,
            snapshot: SensorSnapshot,
        ) -> impl Future<Output = Result<(), GrowHubError>> + Send {
            self.snapshots.lock().unwrap().push(snapshot);
            async { Ok(()) }
        }

        fn latest_snapshots(
            &self,
            limit: u32,
        ) -> impl Future<Output = Result<Vec<SensorSnapshot>, GrowHubError>> + Send {
            let mut all = self.snapshots.lock().unwrap().clone();
            all.reverse();
            all.truncate(limit as usize);
            async { Ok(all) }
        }

        fn append_audit_entry(
            &self,
            entry: AuditEntry,
        ) -> impl Future<Output = Result<(), GrowHubError>> + Send {
            self.audit.lock().unwrap().push(entry);
            async { Ok(()) }
        }

        fn recent_audit_entries(
            &self,
            limit: u32,
        ) -> impl Future<Output = Result<Vec<AuditEntry>, GrowHubError>> + Send {
            let mut all = self.audit.lock().unwrap().clone();
            all.reverse();
            all.truncate(limit as usize);
            async { Ok(all) }
        }

        fn load_actuators_for_device(
            &self,
            device_id: DeviceId,
        ) -> impl Future<Output = Result<Vec<Actuator>, GrowHubError>> + Send {
            let result: Vec<Actuator> = self
                .actuators
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.device_id == device_id)
                .cloned()
                .collect();
            async { Ok(result) }
        }

        fn load_actuator(
            &self,
            id: ActuatorId,
        ) -> impl Future<Output = Result<Option<Actuator>, GrowHubError>> + Send {
            let result = self
                .actuators
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.id == id)
                .cloned();
            async { Ok(result) }
        }

        fn load_device_threshold_override(
            &self,
            device_id: DeviceId,
        ) -> impl Future<Output = Result<Option<ThresholdOverride>, GrowHubError>> + Send {
            let result = self
                .devices
                .lock()
                .unwrap()
                .iter()
                .find(|d| d.id == device_id)
                .and_then(|d| d.thresholds.clone());
            async { Ok(result) }
        }

        fn load_active_devices(
            &self,
        ) -> impl Future<Output = Result<Vec<Device>, GrowHubError>> + Send {
            let result: Vec<Device> = self
                .devices
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.active)
                .cloned()
                .collect();
            async { Ok(result) }
        }
    }

    struct NoAuthorization;

    impl Authorization for NoAuthorization {
        fn device_for_principal(
            &self,
            _device_id: DeviceId,
            _principal_id: growhub_domain::id::PrincipalId,
        ) -> impl Future<Output = Result<Option<Device>, GrowHubError>> + Send {
            async { Ok(None) }
        }

        fn devices_for_principal(
            &self,
            _principal_id: growhub_domain::id::PrincipalId,
        ) -> impl Future<Output = Result<Vec<Device>, GrowHubError>> + Send {
            async { Ok(Vec::new()) }
        }
    }

    struct NullDriver;

    impl ActuatorDriver for NullDriver {
        fn write(
            &self,
            _actuator: Option<&Actuator>,
            _kind: ActuatorKind,
            _on: bool,
        ) -> Result<(), GrowHubError> {
            Ok(())
        }
    }

    struct FixedReader {
        snapshot_for: fn(&Device) -> SensorSnapshot,
        fail_device: Option<DeviceId>,
    }

    impl SensorReader for FixedReader {
        fn read(
            &self,
            device: &Device,
        ) -> impl Future<Output = Result<SensorSnapshot, GrowHubError>> + Send {
            let result = if self.fail_device == Some(device.id) {
                Err(GrowHubError::transient(std::io::Error::other(
                    "sensor offline",
                )))
            } else {
                Ok((self.snapshot_for)(device))
            };
            async { result }
        }
    }

    fn dry_snapshot(device: &Device) -> SensorSnapshot {
        SensorSnapshot {
            moisture: Some(10.0),
            water_level: Some(60.0),
            light: Some(500.0),
            temperature: Some(22.0),
            ..SensorSnapshot::empty(device.id)
        }
    }

    fn device(name: &str) -> Device {
        Device::builder()
            .name(name)
            .external_id(name)
            .build()
            .unwrap()
    }

    fn pipeline(
        devices: Vec<Device>,
        actuators: Vec<Actuator>,
        reader: FixedReader,
    ) -> (
        CollectionPipeline<
            FixedReader,
            Arc<InMemoryPersistence>,
            NoAuthorization,
            NullDriver,
        >,
        Arc<InMemoryPersistence>,
        Arc<StateStore>,
    ) {
        let persistence = Arc::new(InMemoryPersistence {
            devices: Mutex::new(devices),
            actuators: Mutex::new(actuators),
            ..InMemoryPersistence::default()
        });
        let state = Arc::new(StateStore::new());
        let orchestrator = Arc::new(ActuatorOrchestrator::new(
            Arc::clone(&persistence),
            NoAuthorization,
            NullDriver,
            Arc::clone(&state),
        ));
        (
            CollectionPipeline::new(
                reader,
                Arc::clone(&persistence),
                orchestrator,
                SharedThresholds::default(),
            ),
            persistence,
            state,
        )
    }

    #[tokio::test]
    async fn should_persist_snapshot_and_actuate_on_dry_soil() {
        let dev = device("zone-a");
        let pump = Actuator::builder()
            .device_id(dev.id)
            .kind(ActuatorKind::Pump)
            .port("D6")
            .build()
            .unwrap();
        let (pipeline, persistence, state) = pipeline(
            vec![dev.clone()],
            vec![pump.clone()],
            FixedReader {
                snapshot_for: dry_snapshot,
                fail_device: None,
            },
        );

        pipeline.run_tick().await.unwrap();

        assert_eq!(persistence.snapshots.lock().unwrap().len(), 1);
        assert_eq!(state.get(&StateKey::actuator(&pump)), Some(true));
        let audit = persistence.audit.lock().unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].source, ActuationSource::Scheduler);
    }

    #[tokio::test]
    async fn should_not_reapply_unchanged_state_on_second_tick() {
        let dev = device("zone-a");
        let pump = Actuator::builder()
            .device_id(dev.id)
            .kind(ActuatorKind::Pump)
            .port("D6")
            .build()
            .unwrap();
        let (pipeline, persistence, _) = pipeline(
            vec![dev.clone()],
            vec![pump],
            FixedReader {
                snapshot_for: dry_snapshot,
                fail_device: None,
            },
        );

        pipeline.run_tick().await.unwrap();
        pipeline.run_tick().await.unwrap();

        // Two snapshots but a single actuation: steady conditions debounce.
        assert_eq!(persistence.snapshots.lock().unwrap().len(), 2);
        assert_eq!(persistence.audit.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_contain_sensor_failure_to_one_device() {
        let healthy = device("zone-a");
        let broken = device("zone-b");
        let (pipeline, persistence, _) = pipeline(
            vec![broken.clone(), healthy.clone()],
            vec![],
            FixedReader {
                snapshot_for: dry_snapshot,
                fail_device: Some(broken.id),
            },
        );

        pipeline.run_tick().await.unwrap();

        let snapshots = persistence.snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].device_id, healthy.id);
    }

    #[tokio::test]
    async fn should_succeed_with_no_active_devices() {
        let (pipeline, persistence, _) = pipeline(
            vec![],
            vec![],
            FixedReader {
                snapshot_for: dry_snapshot,
                fail_device: None,
            },
        );

        pipeline.run_tick().await.unwrap();
        assert!(persistence.snapshots.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_honor_device_threshold_override() {
        let mut dev = device("zone-a");
        // Zone wants drier soil before irrigating: min 5 instead of 30.
        dev.thresholds = Some(ThresholdOverride {
            moisture_min: Some(5.0),
            ..ThresholdOverride::default()
        });
        let pump = Actuator::builder()
            .device_id(dev.id)
            .kind(ActuatorKind::Pump)
            .port("D6")
            .build()
            .unwrap();
        let (pipeline, persistence, state) = pipeline(
            vec![dev.clone()],
            vec![pump.clone()],
            FixedReader {
                snapshot_for: dry_snapshot, // moisture 10, above the override
                fail_device: None,
            },
        );

        pipeline.run_tick().await.unwrap();

        assert_eq!(state.get(&StateKey::actuator(&pump)), Some(false));
        assert_eq!(persistence.audit.lock().unwrap().len(), 1);
    }
}
