use sitemap_core::job::JobStatus;
use thiserror::Error;

pub mod artifact_store;
pub mod clock;
pub mod dynamo;
pub mod job_ids;
pub mod job_store;
#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;
pub mod s3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("job {0} already exists")]
    AlreadyExists(String),
    #[error("job {job_id} is not in {expected} state")]
    ConditionFailed { job_id: String, expected: JobStatus },
    #[error("stored job record is malformed: {0}")]
    MalformedRecord(String),
    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        Self::Backend {
            operation,
            message: message.to_string(),
        }
    }
}
