use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::JobError;
use crate::llama::SplitResult;

/// Opaque identifier of a split job. Generated once at submission, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = JobError;

    /// Text that is not a UUID can never name a job, so it parses to `NotFound`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| JobError::NotFound(s.to_string()))
    }
}

/// Lifecycle status of a job.
///
/// Each job flows through: pending → processing → completed | failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether a record in `self` may move to `next`.
    ///
    /// Only forward moves are legal, and nothing leaves a terminal state.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A write to the mutable part of a job record.
///
/// Terminal variants carry exactly the payload that belongs to them, so a
/// completed job can never hold an error and a failed job never a result.
#[derive(Debug, Clone, PartialEq)]
pub enum JobUpdate {
    Processing,
    Completed(SplitResult),
    Failed(String),
}

impl JobUpdate {
    pub fn status(&self) -> JobStatus {
        match self {
            JobUpdate::Processing => JobStatus::Processing,
            JobUpdate::Completed(_) => JobStatus::Completed,
            JobUpdate::Failed(_) => JobStatus::Failed,
        }
    }
}

/// One document-split job as held by the [`JobStore`](super::JobStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub file_name: Option<String>,
    pub result: Option<SplitResult>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(file_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            file_name,
            result: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply `update` in place, rejecting any move the lifecycle does not allow.
    /// On error the record is left untouched.
    pub fn apply(&mut self, update: JobUpdate) -> Result<(), JobError> {
        let next = update.status();
        if !self.status.can_transition_to(next) {
            return Err(JobError::InvalidTransition {
                id: self.id.to_string(),
                from: self.status,
                to: next,
            });
        }

        match update {
            JobUpdate::Processing => {}
            JobUpdate::Completed(result) => self.result = Some(result),
            JobUpdate::Failed(message) => self.error_message = Some(message),
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Read model handed to pollers.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetails {
    pub job_id: String,
    pub status: JobStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SplitResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<Job> for JobDetails {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id.to_string(),
            status: job.status,
            created_at: job.created_at.to_rfc3339(),
            result: job.result,
            error_message: job.error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llama::Segment;

    fn one_segment() -> SplitResult {
        SplitResult {
            segments: vec![Segment {
                category: "default".into(),
                pages: vec![1, 2],
                confidence_category: "high".into(),
            }],
        }
    }

    #[test]
    fn job_creation_defaults() {
        let job = Job::new(Some("invoices.pdf".into()));
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.result.is_none());
        assert!(job.error_message.is_none());
        assert_eq!(job.created_at, job.updated_at);
        assert_eq!(job.file_name.as_deref(), Some("invoices.pdf"));
    }

    #[test]
    fn happy_path_walks_all_states() {
        let mut job = Job::new(None);
        let created_at = job.created_at;

        job.apply(JobUpdate::Processing).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.result.is_none());

        job.apply(JobUpdate::Completed(one_segment())).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result, Some(one_segment()));
        assert!(job.error_message.is_none());
        assert_eq!(job.created_at, created_at);
    }

    #[test]
    fn failure_records_message_only() {
        let mut job = Job::new(None);
        job.apply(JobUpdate::Processing).unwrap();
        job.apply(JobUpdate::Failed("invalid format".into())).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("invalid format"));
        assert!(job.result.is_none());
    }

    #[test]
    fn pending_cannot_skip_processing() {
        let mut job = Job::new(None);
        let err = job.apply(JobUpdate::Completed(one_segment())).unwrap_err();
        assert!(matches!(
            err,
            JobError::InvalidTransition {
                from: JobStatus::Pending,
                to: JobStatus::Completed,
                ..
            }
        ));
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.result.is_none());
    }

    #[test]
    fn terminal_state_is_final() {
        let mut job = Job::new(None);
        job.apply(JobUpdate::Processing).unwrap();
        job.apply(JobUpdate::Failed("boom".into())).unwrap();
        let snapshot = job.clone();

        assert!(job.apply(JobUpdate::Processing).is_err());
        assert!(job.apply(JobUpdate::Completed(one_segment())).is_err());
        assert!(job.apply(JobUpdate::Failed("again".into())).is_err());
        assert_eq!(job, snapshot);
    }

    #[test]
    fn transition_table() {
        use JobStatus::*;
        let all = [Pending, Processing, Completed, Failed];
        let allowed = [(Pending, Processing), (Processing, Completed), (Processing, Failed)];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
        assert!(Completed.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!Processing.is_terminal());
    }

    #[test]
    fn status_display_and_serde_are_lowercase() {
        assert_eq!(JobStatus::Processing.to_string(), "processing");
        assert_eq!(
            serde_json::to_string(&JobStatus::Completed).unwrap(),
            r#""completed""#
        );
    }

    #[test]
    fn job_id_parse() {
        let id = JobId::new();
        assert_eq!(id.to_string().parse::<JobId>().unwrap(), id);

        let err = "does-not-exist".parse::<JobId>().unwrap_err();
        assert!(matches!(err, JobError::NotFound(ref s) if s == "does-not-exist"));
    }

    #[test]
    fn details_omit_empty_payloads() {
        let job = Job::new(None);
        let id = job.id.to_string();
        let json = serde_json::to_value(JobDetails::from(job)).unwrap();
        assert_eq!(json["job_id"], id);
        assert_eq!(json["status"], "pending");
        assert!(json.get("result").is_none());
        assert!(json.get("error_message").is_none());
    }
}
