//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`GrowHubError`]
//! via `#[from]` or an explicit `From` impl. The pure rule evaluation in the
//! app crate never errors; everything fallible is IO at the edges.

use std::fmt;

/// Top-level error enum shared by all crates.
#[derive(Debug, thiserror::Error)]
pub enum GrowHubError {
    /// A domain invariant or input check failed.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced device or actuator does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The requesting principal does not own the targeted device.
    #[error("not authorized")]
    Authorization(#[from] AuthorizationError),

    /// A persistence or hardware write failed; the operation may be retried.
    #[error("transient IO error")]
    Transient(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GrowHubError {
    /// Wrap an arbitrary IO failure as a transient error.
    pub fn transient<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transient(Box::new(err))
    }
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required name field was empty.
    #[error("name must not be empty")]
    EmptyName,
    /// A required external identifier was empty.
    #[error("external identifier must not be empty")]
    EmptyExternalId,
    /// An actuator port label was empty.
    #[error("actuator port must not be empty")]
    EmptyPort,
    /// A threshold value was not a finite, non-negative number.
    #[error("threshold {field} must be a finite non-negative number")]
    InvalidThreshold {
        /// Name of the offending threshold key.
        field: &'static str,
    },
    /// An actuator kind label was not part of the closed set.
    #[error("unknown actuator kind: {0}")]
    UnknownActuatorKind(String),
}

/// A lookup by id found nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Human-readable entity name (`"Device"`, `"Actuator"`).
    pub entity: &'static str,
    /// The identifier that missed.
    pub id: String,
}

/// A device exists but is not owned by the requesting principal.
#[derive(Debug, thiserror::Error)]
pub struct AuthorizationError {
    /// The targeted device.
    pub device_id: String,
    /// The principal that made the request.
    pub principal_id: String,
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device {} is not owned by principal {}",
            self.device_id, self.principal_id
        )
    }
}
