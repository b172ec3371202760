//! Sensor port — produces one snapshot per device per tick.

use std::future::Future;
use std::sync::Arc;

use growhub_domain::device::Device;
use growhub_domain::error::GrowHubError;
use growhub_domain::snapshot::SensorSnapshot;

/// Produces a fresh sensor snapshot for a device.
///
/// Implementations may talk to real hardware or simulate readings; either
/// way a read is assumed local and fast, so no timeout is modeled.
pub trait SensorReader {
    /// Read all sensors of `device` and return one simultaneous snapshot.
    fn read(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<SensorSnapshot, GrowHubError>> + Send;
}

impl<T: SensorReader + Send + Sync> SensorReader for Arc<T> {
    fn read(
        &self,
        device: &Device,
    ) -> impl Future<Output = Result<SensorSnapshot, GrowHubError>> + Send {
        (**self).read(device)
    }
}
