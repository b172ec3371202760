//! Actuator driver port — the fire-and-forget hardware write.
//!
//! Writes are synchronous and never wait for a device acknowledgement; the
//! state store, not the hardware, is what the rest of the system reads.

use std::sync::Arc;

use growhub_domain::actuator::{Actuator, ActuatorKind};
use growhub_domain::error::GrowHubError;

/// Emits the physical on/off write for an actuation.
pub trait ActuatorDriver {
    /// Drive the target to `on`.
    ///
    /// `actuator` is `None` on the unscoped fallback path, when no actuator
    /// is registered for the requested device and kind.
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::Transient`] when the write fails.
    fn write(
        &self,
        actuator: Option<&Actuator>,
        kind: ActuatorKind,
        on: bool,
    ) -> Result<(), GrowHubError>;
}

impl<T: ActuatorDriver + Send + Sync> ActuatorDriver for Arc<T> {
    fn write(
        &self,
        actuator: Option<&Actuator>,
        kind: ActuatorKind,
        on: bool,
    ) -> Result<(), GrowHubError> {
        (**self).write(actuator, kind, on)
    }
}
