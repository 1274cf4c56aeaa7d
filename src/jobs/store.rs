//! In-memory job store shared by the runner and every poller.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::job::{Job, JobId, JobUpdate};
use crate::error::JobError;

/// Process-lifetime map from [`JobId`] to [`Job`].
///
/// Readers get clones taken under the read lock and writers mutate under the
/// write lock, so a snapshot is always either fully before or fully after an
/// update. Records are never evicted.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh pending record and return its id.
    pub fn create(&self, file_name: Option<String>) -> JobId {
        let job = Job::new(file_name);
        let id = job.id;
        self.write().insert(id, job);
        id
    }

    /// Snapshot of the record for `id`.
    pub fn get(&self, id: &JobId) -> Result<Job, JobError> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| JobError::NotFound(id.to_string()))
    }

    pub fn update(&self, id: &JobId, update: JobUpdate) -> Result<(), JobError> {
        let mut jobs = self.write();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;
        job.apply(update)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Writers only insert or call `Job::apply`, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<JobId, Job>> {
        self.jobs.read().unwrap_or_else(|e| {
            tracing::error!("RwLock poisoned reading jobs map: {e}");
            PoisonError::into_inner(e)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<JobId, Job>> {
        self.jobs.write().unwrap_or_else(|e| {
            tracing::error!("RwLock poisoned writing jobs map: {e}");
            PoisonError::into_inner(e)
        })
    }
}
