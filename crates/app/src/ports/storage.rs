//! Persistence port — snapshot, audit, and provisioning storage.
//!
//! Each call is assumed atomic and durable on its own; the core never spans
//! a transaction across calls.

use std::future::Future;
use std::sync::Arc;

use growhub_domain::actuator::Actuator;
use growhub_domain::audit::AuditEntry;
use growhub_domain::device::Device;
use growhub_domain::error::GrowHubError;
use growhub_domain::id::{ActuatorId, DeviceId};
use growhub_domain::snapshot::SensorSnapshot;
use growhub_domain::thresholds::ThresholdOverride;

/// Storage collaborator consumed by the control loop.
pub trait Persistence {
    /// Persist one sensor snapshot.
    fn save_snapshot(
        &self,
        snapshot: SensorSnapshot,
    ) -> impl Future<Output = Result<(), GrowHubError>> + Send;

    /// Most recent snapshots, newest first.
    fn latest_snapshots(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<SensorSnapshot>, GrowHubError>> + Send;

    /// Append one immutable audit entry.
    fn append_audit_entry(
        &self,
        entry: AuditEntry,
    ) -> impl Future<Output = Result<(), GrowHubError>> + Send;

    /// Most recent audit entries, newest first.
    fn recent_audit_entries(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<AuditEntry>, GrowHubError>> + Send;

    /// All actuators registered on a device.
    fn load_actuators_for_device(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Actuator>, GrowHubError>> + Send;

    /// Look up a single actuator by id.
    fn load_actuator(
        &self,
        id: ActuatorId,
    ) -> impl Future<Output = Result<Option<Actuator>, GrowHubError>> + Send;

    /// The device's partial threshold override, if provisioned.
    fn load_device_threshold_override(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<ThresholdOverride>, GrowHubError>> + Send;

    /// All devices flagged active, i.e. the collection targets.
    fn load_active_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<Device>, GrowHubError>> + Send;
}

impl<T: Persistence + Send + Sync> Persistence for Arc<T> {
    fn save_snapshot(
        &self,
        snapshot: SensorSnapshot,
    ) -> impl Future<Output = Result<(), GrowHubError>> + Send {
        (**self).save_snapshot(snapshot)
    }

    fn latest_snapshots(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<SensorSnapshot>, GrowHubError>> + Send {
        (**self).latest_snapshots(limit)
    }

    fn append_audit_entry(
        &self,
        entry: AuditEntry,
    ) -> impl Future<Output = Result<(), GrowHubError>> + Send {
        (**self).append_audit_entry(entry)
    }

    fn recent_audit_entries(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<AuditEntry>, GrowHubError>> + Send {
        (**self).recent_audit_entries(limit)
    }

    fn load_actuators_for_device(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Actuator>, GrowHubError>> + Send {
        (**self).load_actuators_for_device(device_id)
    }

    fn load_actuator(
        &self,
        id: ActuatorId,
    ) -> impl Future<Output = Result<Option<Actuator>, GrowHubError>> + Send {
        (**self).load_actuator(id)
    }

    fn load_device_threshold_override(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<ThresholdOverride>, GrowHubError>> + Send {
        (**self).load_device_threshold_override(device_id)
    }

    fn load_active_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<Device>, GrowHubError>> + Send {
        (**self).load_active_devices()
    }
}
