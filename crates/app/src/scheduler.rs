//! Background job scheduling for periodic collection ticks.
//!
//! Jobs run on fixed intervals inside spawned tasks. Shutdown goes through a
//! watch channel rather than task abort so an in-flight tick always finishes
//! before the loop exits; a stop request only takes effect between ticks.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use growhub_domain::error::GrowHubError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

struct Job {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
    interval: Duration,
}

/// Health of a single registered job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHealth {
    pub id: String,
    pub running: bool,
}

/// Registry of periodic jobs with start/stop/restart control.
///
/// A job id that was started at least once stays in the health report even
/// after it is stopped, so an operator can tell "stopped" apart from "never
/// configured".
#[derive(Default)]
pub struct CollectionScheduler {
    jobs: Mutex<HashMap<String, Job>>,
    known: Mutex<BTreeSet<String>>,
}

impl CollectionScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a periodic job. The first tick fires immediately, then every
    /// `interval`. Returns `false` without touching anything when a job with
    /// this id is already running.
    ///
    /// Tick errors are logged and never deregister the job; a failing sensor
    /// must not silence the whole loop.
    pub fn start<F, Fut>(&self, job_id: &str, interval: Duration, tick: F) -> bool
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), GrowHubError>> + Send + 'static,
    {
        let mut jobs = self.lock_jobs();
        if jobs.contains_key(job_id) {
            tracing::debug!(job_id, "job already running, start is a no-op");
            return false;
        }

        let (shutdown, mut rx) = watch::channel(false);
        let id = job_id.to_string();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = tick().await {
                            tracing::error!(job_id = %id, error = %err, "collection tick failed");
                        }
                    }
                    _ = rx.changed() => {
                        tracing::info!(job_id = %id, "job shutting down");
                        break;
                    }
                }
            }
        });

        jobs.insert(
            job_id.to_string(),
            Job {
                shutdown,
                handle,
                interval,
            },
        );
        self.lock_known().insert(job_id.to_string());
        tracing::info!(job_id, interval_secs = interval.as_secs_f64(), "job started");
        true
    }

    /// Stop a running job. Returns `false` when no job with this id is
    /// running. The id stays in the health report as stopped.
    pub fn stop(&self, job_id: &str) -> bool {
        let Some(job) = self.lock_jobs().remove(job_id) else {
            tracing::debug!(job_id, "stop requested for unknown job");
            return false;
        };
        // Signal and let the loop wind down on its own; aborting could cut
        // a tick mid-write.
        let _ = job.shutdown.send(true);
        drop(job.handle);
        tracing::info!(job_id, "job stopped");
        true
    }

    /// Stop then start a job with a fresh tick closure, keeping the previous
    /// interval when `interval` is `None`.
    pub fn restart<F, Fut>(&self, job_id: &str, interval: Option<Duration>, tick: F) -> bool
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), GrowHubError>> + Send + 'static,
    {
        let previous = self
            .lock_jobs()
            .get(job_id)
            .map(|job| job.interval);
        self.stop(job_id);
        let Some(interval) = interval.or(previous) else {
            tracing::warn!(job_id, "restart without interval for never-started job");
            return false;
        };
        self.start(job_id, interval, tick)
    }

    #[must_use]
    pub fn is_running(&self, job_id: &str) -> bool {
        self.lock_jobs().contains_key(job_id)
    }

    /// Health of every job id ever started, stopped ones included.
    #[must_use]
    pub fn health(&self) -> Vec<JobHealth> {
        let jobs = self.lock_jobs();
        self.lock_known()
            .iter()
            .map(|id| JobHealth {
                id: id.clone(),
                running: jobs.contains_key(id),
            })
            .collect()
    }

    /// Stop every running job.
    pub fn shutdown(&self) {
        let ids: Vec<String> = self.lock_jobs().keys().cloned().collect();
        for id in ids {
            self.stop(&id);
        }
    }

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_known(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.known.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
