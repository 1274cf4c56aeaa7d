use thiserror::Error;

use crate::jobs::JobStatus;
use crate::llama::LlamaError;

#[derive(Debug, Error)]
pub enum AutosplitError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("LlamaCloud API error: {0}")]
    Llama(#[from] LlamaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failures of the job store's id-keyed interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(String),

    /// A write that would move a record backwards or out of a terminal state.
    #[error("Job {id}: illegal transition {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: JobStatus,
        to: JobStatus,
    },
}
