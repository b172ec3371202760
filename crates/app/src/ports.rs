//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the control-loop
//! layer and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod authorization;
pub mod driver;
pub mod sensor;
pub mod storage;

pub use authorization::Authorization;
pub use driver::ActuatorDriver;
pub use sensor::SensorReader;
pub use storage::Persistence;
