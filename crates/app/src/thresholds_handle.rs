//! Shared process-wide threshold set.
//!
//! One explicitly constructed, lock-guarded instance replaces the global
//! mutable threshold map of earlier firmware. Patches are applied atomically
//! under the write lock so concurrent readers never observe a partially
//! updated set.

use std::sync::{Arc, PoisonError, RwLock};

use growhub_domain::error::GrowHubError;
use growhub_domain::thresholds::{ThresholdOverride, ThresholdSet};

/// Cloneable handle to the process default [`ThresholdSet`].
#[derive(Debug, Clone, Default)]
pub struct SharedThresholds {
    inner: Arc<RwLock<ThresholdSet>>,
}

impl SharedThresholds {
    /// Wrap an initial threshold set.
    #[must_use]
    pub fn new(initial: ThresholdSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// A copy of the current defaults.
    #[must_use]
    pub fn current(&self) -> ThresholdSet {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate and apply a partial patch, returning the merged result.
    ///
    /// The merge happens in one critical section; keys absent from the
    /// patch keep their current values.
    ///
    /// # Errors
    ///
    /// Returns [`GrowHubError::Validation`] when the patch contains a
    /// non-finite or negative value. The current set is left untouched.
    pub fn patch(&self, patch: &ThresholdOverride) -> Result<ThresholdSet, GrowHubError> {
        patch.validate()?;
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = guard.merged(patch);
        Ok(guard.clone())
    }
}
