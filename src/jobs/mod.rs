//! Background split jobs: the record, the store that owns it and the runner
//! that moves it through pending → processing → completed | failed.

mod job;
mod runner;
mod store;

pub use job::{Job, JobDetails, JobId, JobStatus, JobUpdate};
pub use runner::{JobRunner, SplitOptions, SplitProvider};
pub use store::JobStore;
