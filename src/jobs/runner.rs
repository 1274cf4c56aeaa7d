//! Drives split jobs from submission to a terminal state in the background.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::Instrument;

use super::job::{Job, JobId, JobStatus, JobUpdate};
use super::store::JobStore;
use crate::error::JobError;
use crate::llama::SplitResult;

/// The remote capability that actually splits a document.
///
/// Called once per job from the job's own background task; the runner never
/// retries it.
#[async_trait]
pub trait SplitProvider: Send + Sync {
    async fn split(&self, content: Vec<u8>, options: &SplitOptions)
    -> anyhow::Result<SplitResult>;
}

/// Per-job parameters passed through to the [`SplitProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    pub file_name: String,
    pub content_type: String,
    /// Overrides the configured description of the `default` category.
    pub category_description: Option<String>,
    /// A document already uploaded to the provider; when set, `content` is not uploaded.
    pub file_id: Option<String>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            file_name: "document.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            category_description: None,
            file_id: None,
        }
    }
}

/// Accepts split work, records it in the [`JobStore`] and runs it detached.
///
/// Cheap to share behind an `Arc`; every job gets its own tokio task, with no
/// bound on how many run at once.
pub struct JobRunner {
    store: Arc<JobStore>,
    provider: Arc<dyn SplitProvider>,
}

impl JobRunner {
    pub fn new(store: Arc<JobStore>, provider: Arc<dyn SplitProvider>) -> Self {
        Self { store, provider }
    }

    /// Create a pending job and schedule it. Returns before any split work starts.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, content: Vec<u8>, options: SplitOptions) -> JobId {
        let id = self.store.create(Some(options.file_name.clone()));
        tracing::info!(job_id = %id, file_name = %options.file_name, bytes = content.len(), "job submitted");

        let store = Arc::clone(&self.store);
        let provider = Arc::clone(&self.provider);
        let span = tracing::info_span!("split_job", job_id = %id);
        tokio::spawn(run_job(store, provider, id, content, options).instrument(span));

        id
    }

    pub fn get(&self, id: &JobId) -> Result<Job, JobError> {
        self.store.get(id)
    }

    /// Poll the store until `id` reaches `completed` or `failed`.
    ///
    /// `on_status` is called with the first status seen and again on every change.
    pub async fn wait_for_terminal(
        &self,
        id: &JobId,
        poll_interval: Duration,
        mut on_status: impl FnMut(JobStatus),
    ) -> Result<Job, JobError> {
        let mut last = None;
        loop {
            let job = self.store.get(id)?;
            if last != Some(job.status) {
                on_status(job.status);
                last = Some(job.status);
            }
            if job.status.is_terminal() {
                return Ok(job);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

async fn run_job(
    store: Arc<JobStore>,
    provider: Arc<dyn SplitProvider>,
    id: JobId,
    content: Vec<u8>,
    options: SplitOptions,
) {
    if let Err(e) = store.update(&id, JobUpdate::Processing) {
        tracing::error!(error = %e, "store inconsistency, job abandoned before processing");
        return;
    }
    tracing::info!("job processing");

    // The provider runs in its own task so a panic in it becomes a JoinError here.
    let call = tokio::spawn(
        async move { provider.split(content, &options).await }.in_current_span(),
    );

    let update = match call.await {
        Ok(Ok(result)) => {
            tracing::info!(segments = result.segments.len(), "job completed");
            JobUpdate::Completed(result)
        }
        Ok(Err(e)) => {
            let message = format!("{e:#}");
            tracing::warn!(error = %message, "job failed");
            JobUpdate::Failed(message)
        }
        Err(join_err) => {
            let message = format!("split task panicked: {join_err}");
            tracing::error!(error = %message, "job failed");
            JobUpdate::Failed(message)
        }
    };

    // The record stays `processing` if this write is rejected; the log line is the alarm.
    if let Err(e) = store.update(&id, update) {
        tracing::error!(error = %e, "store inconsistency, terminal state was not recorded");
    }
}
