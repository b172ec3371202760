//! Authorization port — device ownership checks.
//!
//! Invoked before any targeted actuation: a device that does not resolve
//! under the requesting principal must fail, never silently no-op.

use std::future::Future;
use std::sync::Arc;

use growhub_domain::device::Device;
use growhub_domain::error::GrowHubError;
use growhub_domain::id::{DeviceId, PrincipalId};

/// Ownership collaborator consumed before targeted actuation.
pub trait Authorization {
    /// Resolve a device only if it belongs to the principal.
    fn device_for_principal(
        &self,
        device_id: DeviceId,
        principal_id: PrincipalId,
    ) -> impl Future<Output = Result<Option<Device>, GrowHubError>> + Send;

    /// All devices owned by the principal.
    fn devices_for_principal(
        &self,
        principal_id: PrincipalId,
    ) -> impl Future<Output = Result<Vec<Device>, GrowHubError>> + Send;
}

impl<T: Authorization + Send + Sync> Authorization for Arc<T> {
    fn device_for_principal(
        &self,
        device_id: DeviceId,
        principal_id: PrincipalId,
    ) -> impl Future<Output = Result<Option<Device>, GrowHubError>> + Send {
        (**self).device_for_principal(device_id, principal_id)
    }

    fn devices_for_principal(
        &self,
        principal_id: PrincipalId,
    ) -> impl Future<Output = Result<Vec<Device>, GrowHubError>> + Send {
        (**self).devices_for_principal(principal_id)
    }
}
