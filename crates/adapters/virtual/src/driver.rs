//! Actuator driver that logs instead of touching hardware.

use growhub_app::ports::ActuatorDriver;
use growhub_domain::actuator::{Actuator, ActuatorKind};
use growhub_domain::error::GrowHubError;

/// Driver for development and simulation: every write becomes a log line.
///
/// The write is fire-and-forget like a real GPIO toggle, so it never fails
/// and never blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDriver;

impl LoggingDriver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ActuatorDriver for LoggingDriver {
    fn write(
        &self,
        actuator: Option<&Actuator>,
        kind: ActuatorKind,
        on: bool,
    ) -> Result<(), GrowHubError> {
        match actuator {
            Some(actuator) => tracing::info!(
                target = %actuator.label(),
                port = %actuator.port,
                %kind,
                state = on,
                "virtual actuator write"
            ),
            None => tracing::info!(%kind, state = on, "virtual actuator write (unscoped)"),
        }
        Ok(())
    }
}
