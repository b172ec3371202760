//! # growhubd — growhub daemon
//!
//! Composition root that wires storage, sensors, and actuation together and
//! runs the periodic collection loop.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the persistence and authorization adapters
//! - Construct the orchestrator and pipeline, injecting adapters via ports
//! - Prime the state store and start the collection job
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use std::sync::Arc;

use growhub_adapter_storage_sqlite_sqlx::{Config as DbConfig, SqliteAuthorization, SqlitePersistence};
use growhub_adapter_virtual::{LoggingDriver, SimulatedSensorReader};
use growhub_app::orchestrator::ActuatorOrchestrator;
use growhub_app::pipeline::CollectionPipeline;
use growhub_app::scheduler::CollectionScheduler;
use growhub_app::state_store::StateStore;
use growhub_app::thresholds_handle::SharedThresholds;
use tracing_subscriber::EnvFilter;

mod config;

const COLLECT_JOB_ID: &str = "sensor_collect";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Adapters
    let persistence = Arc::new(SqlitePersistence::new(pool.clone()));
    let authorization = Arc::new(SqliteAuthorization::new(pool));
    let driver = LoggingDriver::new();

    // Application
    let state = Arc::new(StateStore::new());
    let thresholds = SharedThresholds::default();
    let orchestrator = Arc::new(ActuatorOrchestrator::new(
        Arc::clone(&persistence),
        authorization,
        driver,
        state,
    ));
    let primed = orchestrator.prime().await?;
    tracing::info!(primed, "boot defaults loaded");

    let scheduler = CollectionScheduler::new();
    if config.simulation.enabled {
        let pipeline = Arc::new(CollectionPipeline::new(
            SimulatedSensorReader::new(),
            persistence,
            orchestrator,
            thresholds,
        ));
        scheduler.start(COLLECT_JOB_ID, config.collection_interval(), move || {
            let pipeline = Arc::clone(&pipeline);
            async move { pipeline.run_tick().await }
        });
    } else {
        tracing::warn!("simulation disabled and no hardware reader configured, collection idle");
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    scheduler.shutdown();

    Ok(())
}
