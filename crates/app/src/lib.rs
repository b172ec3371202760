//! # growhub-app
//!
//! Application layer — the automation control loop and **port definitions**.
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Persistence` — snapshots, audit log, actuator/device lookups
//!   - `Authorization` — resolve devices under a principal's ownership
//!   - `SensorReader` — produce a sensor snapshot for a device
//!   - `ActuatorDriver` — the fire-and-forget hardware write
//! - Implement the control loop itself:
//!   - `policy` — pure threshold rule evaluation
//!   - `state_store` — the in-memory convergence cache
//!   - `orchestrator` — apply decisions with auditing and emergency stop
//!   - `scheduler` — periodic job lifecycle with idempotent start/stop
//!   - `pipeline` — the per-tick collect-and-automate sequence
//!   - `thresholds_handle` — the lock-guarded process threshold set
//!
//! ## Dependency rule
//! Depends on `growhub-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod orchestrator;
pub mod pipeline;
pub mod policy;
pub mod ports;
pub mod scheduler;
pub mod state_store;
pub mod thresholds_handle;
