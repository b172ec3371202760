//! # growhub-domain
//!
//! Pure domain model for the growhub environmental automation system.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error taxonomy, timestamps
//! - Define **Devices** (controller nodes owning actuators and reporting sensors)
//! - Define **Actuators** (controllable outputs: pumps, lights, fans, valves, …)
//! - Define **Sensor snapshots** (one simultaneous set of readings per device)
//! - Define **Threshold sets** (numeric bounds driving actuation and alerts)
//! - Define **Alerts** and **water status** classification
//! - Define **Actuation decisions** and immutable **audit entries**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod actuator;
pub mod alert;
pub mod audit;
pub mod decision;
pub mod device;
pub mod snapshot;
pub mod thresholds;
