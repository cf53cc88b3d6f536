//! In-process adapters for tests and local runs.
//!
//! These mirror the conditional semantics of the DynamoDB and S3 adapters so
//! workflow behavior can be exercised without live infrastructure.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sitemap_core::job::{JobRecord, JobUpdate};
use sitemap_core::storage_keys::{default_public_base_url, public_object_url};

use super::artifact_store::{ArtifactMetadata, ArtifactStore, StoredArtifact};
use super::clock::Clock;
use super::job_ids::JobIdSource;
use super::job_store::JobStore;
use super::StoreError;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    records: Mutex<HashMap<String, JobRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, job_id: &str) -> Option<JobRecord> {
        lock(&self.records)
            .get(job_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn seed(&self, record: JobRecord) {
        lock(&self.records)
            .insert(record.job_id.clone(), record);
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create_job(&self, record: &JobRecord) -> Result<(), StoreError> {
        let mut records = lock(&self.records);
        if records.contains_key(&record.job_id) {
            return Err(StoreError::AlreadyExists(record.job_id.clone()));
        }
        records.insert(record.job_id.clone(), record.clone());
        Ok(())
    }

    async fn update_job(&self, job_id: &str, update: &JobUpdate) -> Result<(), StoreError> {
        let mut records = lock(&self.records);
        let condition_failed = || StoreError::ConditionFailed {
            job_id: job_id.to_string(),
            expected: update.expected_status(),
        };
        let record = records.get_mut(job_id).ok_or_else(condition_failed)?;
        if record.status != update.expected_status() {
            return Err(condition_failed());
        }
        record.apply(update).map_err(|_| condition_failed())
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        Ok(self.get(job_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
    pub metadata: ArtifactMetadata,
}

#[derive(Debug)]
pub struct InMemoryArtifactStore {
    public_base_url: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl InMemoryArtifactStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            public_base_url: default_public_base_url(bucket),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        lock(&self.objects)
            .keys()
            .cloned()
            .collect()
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        lock(&self.objects)
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put_artifact(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: &ArtifactMetadata,
    ) -> Result<StoredArtifact, StoreError> {
        lock(&self.objects).insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
                metadata: metadata.clone(),
            },
        );
        Ok(StoredArtifact {
            key: key.to_string(),
            public_url: public_object_url(&self.public_base_url, key),
        })
    }
}

/// Clock that starts at a fixed instant and advances by `step` per reading.
#[derive(Debug)]
pub struct SteppingClock {
    start: DateTime<Utc>,
    step: Duration,
    readings: AtomicUsize,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            start,
            step,
            readings: AtomicUsize::new(0),
        }
    }

    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::new(at, Duration::zero())
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let reading = self.readings.fetch_add(1, Ordering::SeqCst);
        self.start + self.step * i32::try_from(reading).unwrap_or(i32::MAX)
    }
}

/// Deterministic `{prefix}-{n}` identifiers.
#[derive(Debug)]
pub struct SequentialJobIds {
    prefix: String,
    next: AtomicUsize,
}

impl SequentialJobIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicUsize::new(1),
        }
    }
}

impl JobIdSource for SequentialJobIds {
    fn next_job_id(&self) -> String {
        let value = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{value}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use sitemap_core::job::JobStatus;

    use super::*;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn failed_update() -> JobUpdate {
        JobUpdate::Failed {
            updated_at: "2026-10-19T08:30:05.000Z".to_string(),
            error_message: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_job_ids() {
        let store = InMemoryJobStore::new();
        let record = JobRecord::processing("job-1", "site1", 1, created_at());

        store.create_job(&record).await.expect("first create");
        let error = store.create_job(&record).await.expect_err("duplicate");

        assert_eq!(error, StoreError::AlreadyExists("job-1".to_string()));
    }

    #[tokio::test]
    async fn update_requires_processing_record() {
        let store = InMemoryJobStore::new();

        let missing = store
            .update_job("job-404", &failed_update())
            .await
            .expect_err("missing record");
        assert!(matches!(missing, StoreError::ConditionFailed { .. }));

        store
            .create_job(&JobRecord::processing("job-1", "site1", 1, created_at()))
            .await
            .expect("create");
        store
            .update_job("job-1", &failed_update())
            .await
            .expect("first update");
        let repeated = store
            .update_job("job-1", &failed_update())
            .await
            .expect_err("terminal record");

        assert_eq!(
            repeated,
            StoreError::ConditionFailed {
                job_id: "job-1".to_string(),
                expected: JobStatus::Processing,
            }
        );
        assert_eq!(store.get("job-1").map(|r| r.status), Some(JobStatus::Failed));
    }

    #[test]
    fn stepping_clock_advances_per_reading() {
        let clock = SteppingClock::new(created_at(), Duration::seconds(2));

        assert_eq!(clock.now(), created_at());
        assert_eq!(clock.now(), created_at() + Duration::seconds(2));
    }

    #[test]
    fn sequential_ids_are_distinct() {
        let ids = SequentialJobIds::new("job");

        assert_eq!(ids.next_job_id(), "job-1");
        assert_eq!(ids.next_job_id(), "job-2");
    }
}
