//! `SQLite` implementation of the [`Authorization`] port.
//!
//! Ownership is a column on the devices table; resolving a device under a
//! principal is a single indexed lookup, so manual actuation pays one extra
//! query at most.

use std::future::Future;

use sqlx::SqlitePool;

use growhub_app::ports::Authorization;
use growhub_domain::device::Device;
use growhub_domain::error::GrowHubError;
use growhub_domain::id::{DeviceId, PrincipalId};

use crate::error::StorageError;
use crate::persistence::DeviceWrapper;

const SELECT_OWNED_BY_ID: &str = "SELECT * FROM devices WHERE id = ? AND principal_id = ?";
const SELECT_OWNED: &str = "SELECT * FROM devices WHERE principal_id = ?";

/// `SQLite`-backed implementation of the [`Authorization`] port.
pub struct SqliteAuthorization {
    pool: SqlitePool,
}

impl SqliteAuthorization {
    /// Create a new authorization adapter using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Authorization for SqliteAuthorization {
    fn device_for_principal(
        &self,
        device_id: DeviceId,
        principal_id: PrincipalId,
    ) -> impl Future<Output = Result<Option<Device>, GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<DeviceWrapper> = sqlx::query_as(SELECT_OWNED_BY_ID)
                .bind(device_id.to_string())
                .bind(principal_id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(row.map(|w| w.0))
        }
    }

    fn devices_for_principal(
        &self,
        principal_id: PrincipalId,
    ) -> impl Future<Output = Result<Vec<Device>, GrowHubError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<DeviceWrapper> = sqlx::query_as(SELECT_OWNED)
                .bind(principal_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;
            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }
}
