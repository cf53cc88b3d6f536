use async_trait::async_trait;
use sitemap_core::job::{JobRecord, JobUpdate};

use super::StoreError;

/// Key-value persistence for job records, keyed by `jobId`.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persists a new record. Fails with [`StoreError::AlreadyExists`] when
    /// the identifier is already taken.
    async fn create_job(&self, record: &JobRecord) -> Result<(), StoreError>;

    /// Atomically applies `update` when the stored record currently holds
    /// `update.expected_status()`, otherwise fails with
    /// [`StoreError::ConditionFailed`].
    async fn update_job(&self, job_id: &str, update: &JobUpdate) -> Result<(), StoreError>;

    async fn get_job(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError>;
}
