//! Investigation orchestration and job tracking for storelens.

pub mod error;
pub mod investigation;
pub mod jobs;

pub use error::PipelineError;
pub use investigation::{InvestigationReport, Investigator, WebSource};
pub use jobs::{
    InMemoryJobStore, InvestigationOptions, JobId, JobSnapshot, JobStatus, JobStore, JobTracker,
    JobWriter,
};
