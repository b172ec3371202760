//! Virtual adapters for running without hardware.
//!
//! [`SimulatedSensorReader`] produces deterministic, slowly drifting sensor
//! values; [`LoggingDriver`] records actuator writes with tracing instead of
//! toggling GPIO. Together they make a full pipeline runnable on a laptop.

pub mod driver;
pub mod sensor;

pub use driver::LoggingDriver;
pub use sensor::SimulatedSensorReader;
