//! `SQLite` implementation of the [`Persistence`] port.

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use growhub_app::ports::Persistence;
use growhub_domain::actuator::{Actuator, ActuatorKind};
use growhub_domain::audit::{ActuationSource, AuditEntry};
use growhub_domain::device::Device;
use growhub_domain::error::GrowHubError;
use growhub_domain::id::{ActuatorId, AuditEntryId, DeviceId, PrincipalId};
use growhub_domain::snapshot::SensorSnapshot;
use growhub_domain::thresholds::ThresholdOverride;

use crate::error::StorageError;

fn decode<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

/// Wrapper for converting database rows into domain [`Device`].
pub(crate) struct DeviceWrapper(pub(crate) Device);

impl<'r> FromRow<'r, SqliteRow> for DeviceWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let external_id: String = row.try_get("external_id")?;
        let name: String = row.try_get("name")?;
        let location: Option<String> = row.try_get("location")?;
        let kind: Option<String> = row.try_get("kind")?;
        let active: bool = row.try_get("active")?;
        let thresholds: Option<String> = row.try_get("thresholds")?;

        let id = DeviceId::from_str(&id).map_err(decode)?;
        let thresholds = thresholds
            .map(|json| serde_json::from_str::<ThresholdOverride>(&json))
            .transpose()
            .map_err(decode)?;

        Ok(Self(Device {
            id,
            external_id,
            name,
            location,
            kind,
            active,
            thresholds,
        }))
    }
}

/// Wrapper for converting database rows into domain [`Actuator`].
struct ActuatorWrapper(Actuator);

impl<'r> FromRow<'r, SqliteRow> for ActuatorWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let device_id: String = row.try_get("device_id")?;
        let kind: String = row.try_get("kind")?;
        let port: String = row.try_get("port")?;
        let name: Option<String> = row.try_get("name")?;
        let active: bool = row.try_get("active")?;
        let default_state: bool = row.try_get("default_state")?;
        let sensor_key: Option<String> = row.try_get("sensor_key")?;

        let id = ActuatorId::from_str(&id).map_err(decode)?;
        let device_id = DeviceId::from_str(&device_id).map_err(decode)?;
        let kind = ActuatorKind::from_str(&kind).map_err(decode)?;

        Ok(Self(Actuator {
            id,
            device_id,
            kind,
            port,
            name,
            active,
            default_state,
            sensor_key,
        }))
    }
}

/// Wrapper for converting database rows into domain [`SensorSnapshot`].
struct SnapshotWrapper(SensorSnapshot);

impl<'r> FromRow<'r, SqliteRow> for SnapshotWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let device_id: String = row.try_get("device_id")?;
        let recorded_at: String = row.try_get("recorded_at")?;

        let device_id = DeviceId::from_str(&device_id).map_err(decode)?;
        let recorded_at = chrono::DateTime::parse_from_rfc3339(&recorded_at)
            .map_err(decode)?
            .with_timezone(&chrono::Utc);

        Ok(Self(SensorSnapshot {
            device_id,
            temperature: row.try_get("temperature")?,
            humidity: row.try_get("humidity")?,
            light: row.try_get("light")?,
            moisture: row.try_get("moisture")?,
            water_level: row.try_get("water_level")?,
            ec: row.try_get("ec")?,
            ppm: row.try_get("ppm")?,
            recorded_at,
        }))
    }
}

/// Wrapper for converting database rows into domain [`AuditEntry`].
struct AuditWrapper(AuditEntry);

impl<'r> FromRow<'r, SqliteRow> for AuditWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let actuator_id: Option<String> = row.try_get("actuator_id")?;
        let action: String = row.try_get("action")?;
        let state: bool = row.try_get("state")?;
        let source: String = row.try_get("source")?;
        let note: Option<String> = row.try_get("note")?;
        let created_at: String = row.try_get("created_at")?;

        let id = AuditEntryId::from_str(&id).map_err(decode)?;
        let actuator_id = actuator_id
            .map(|s| ActuatorId::from_str(&s))
            .transpose()
            .map_err(decode)?;
        let action = ActuatorKind::from_str(&action).map_err(decode)?;
        let source = match source.as_str() {
            "user" => ActuationSource::User,
            "system" => ActuationSource::System,
            "scheduler" => ActuationSource::Scheduler,
            other => {
                return Err(sqlx::Error::Decode(
                    format!("unknown actuation source: {other}").into(),
                ));
            }
        };
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map_err(decode)?
            .with_timezone(&chrono::Utc);

        Ok(Self(AuditEntry {
            id,
            actuator_id,
            action,
            state,
            source,
            note,
            created_at,
        }))
    }
}

const INSERT_SNAPSHOT: &str = "\
    INSERT INTO sensor_snapshots \
    (device_id, temperature, humidity, light, moisture, water_level, ec, ppm, recorded_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_LATEST_SNAPSHOTS: &str =
    "SELECT * FROM sensor_snapshots ORDER BY recorded_at DESC, id DESC LIMIT ?";
const INSERT_AUDIT: &str = "\
    INSERT INTO audit_log (id, actuator_id, action, state, source, note, created_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?)";
// rowid breaks created_at ties by insertion order; the uuid id column would
// order same-timestamp entries randomly.
const SELECT_RECENT_AUDIT: &str =
    "SELECT * FROM audit_log ORDER BY created_at DESC, rowid DESC LIMIT ?";
const SELECT_ACTUATORS_BY_DEVICE: &str = "SELECT * FROM actuators WHERE device_id = ?";
const SELECT_ACTUATOR_BY_ID: &str = "SELECT * FROM actuators WHERE id = ?";
const SELECT_DEVICE_THRESHOLDS: &str = "SELECT thresholds FROM devices WHERE id = ?";
const SELECT_ACTIVE_DEVICES: &str = "SELECT * FROM devices WHERE active = 1";
const INSERT_DEVICE: &str = "\
    INSERT INTO devices (id, external_id, name, location, kind, active, principal_id, thresholds) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const INSERT_ACTUATOR: &str = "\
    INSERT INTO actuators (id, device_id, kind, port, name, active, default_state, sensor_key) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

/// `SQLite`-backed implementation of the [`Persistence`] port.
pub struct SqlitePersistence {
    pool: SqlitePool,
}

impl SqlitePersistence {
    /// Create a new persistence adapter using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a device, optionally bound to an owning principal.
    ///
    /// Provisioning helper outside the collection loop; the port itself is
    /// read-mostly.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the insert fails, including unique
    /// violations on `external_id`.
    pub async fn create_device(
        &self,
        device: Device,
        principal_id: Option<PrincipalId>,
    ) -> Result<Device, GrowHubError> {
        let thresholds = device
            .thresholds
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(StorageError::from)?;
        sqlx::query(INSERT_DEVICE)
            .bind(device.id.to_string())
            .bind(&device.external_id)
            .bind(&device.name)
            .bind(&device.location)
            .bind(&device.kind)
            .bind(device.active)
            .bind(principal_id.map(|id| id.to_string()))
            .bind(thresholds)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(device)
    }

    /// Register an actuator on a device.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the insert fails.
    pub async fn create_actuator(&self, actuator: Actuator) -> Result<Actuator, GrowHubError> {
        sqlx::query(INSERT_ACTUATOR)
            .bind(actuator.id.to_string())
            .bind(actuator.device_id.to_string())
            .bind(actuator.kind.as_str())
            .bind(&actuator.port)
            .bind(&actuator.name)
            .bind(actuator.active)
            .bind(actuator.default_state)
            .bind(&actuator.sensor_key)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(actuator)
    }
}

impl Persistence for SqlitePersistence {
    fn save_snapshot(
        &self,
        snapshot: SensorSnapshot,
    ) -> impl Future<Output = Result<(), GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT_SNAPSHOT)
                .bind(snapshot.device_id.to_string())
                .bind(snapshot.temperature)
                .bind(snapshot.humidity)
                .bind(snapshot.light)
                .bind(snapshot.moisture)
                .bind(snapshot.water_level)
                .bind(snapshot.ec)
                .bind(snapshot.ppm)
                .bind(snapshot.recorded_at.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(())
        }
    }

    fn latest_snapshots(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<SensorSnapshot>, GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<SnapshotWrapper> = sqlx::query_as(SELECT_LATEST_SNAPSHOTS)
                .bind(limit)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn append_audit_entry(
        &self,
        entry: AuditEntry,
    ) -> impl Future<Output = Result<(), GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(INSERT_AUDIT)
                .bind(entry.id.to_string())
                .bind(entry.actuator_id.map(|id| id.to_string()))
                .bind(entry.action.as_str())
                .bind(entry.state)
                .bind(entry.source.as_str())
                .bind(&entry.note)
                .bind(entry.created_at.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(())
        }
    }

    fn recent_audit_entries(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<AuditEntry>, GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<AuditWrapper> = sqlx::query_as(SELECT_RECENT_AUDIT)
                .bind(limit)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn load_actuators_for_device(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Actuator>, GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<ActuatorWrapper> = sqlx::query_as(SELECT_ACTUATORS_BY_DEVICE)
                .bind(device_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn load_actuator(
        &self,
        id: ActuatorId,
    ) -> impl Future<Output = Result<Option<Actuator>, GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<ActuatorWrapper> = sqlx::query_as(SELECT_ACTUATOR_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(row.map(|w| w.0))
        }
    }

    fn load_device_threshold_override(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Option<ThresholdOverride>, GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<(Option<String>,)> = sqlx::query_as(SELECT_DEVICE_THRESHOLDS)
                .bind(device_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            row.and_then(|(json,)| json)
                .map(|json| serde_json::from_str(&json))
                .transpose()
                .map_err(|err| StorageError::from(err).into())
        }
    }

    fn load_active_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<Device>, GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<DeviceWrapper> = sqlx::query_as(SELECT_ACTIVE_DEVICES)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
