//! Job record shape and its forward-only status lifecycle.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Complete,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "complete" => Some(Self::Complete),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Complete)
                | (Self::Processing, Self::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job status cannot move from {from} to {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Persisted state of one sitemap generation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub job_id: String,
    pub website_id: String,
    pub status: JobStatus,
    pub created_at: String,
    pub updated_at: String,
    pub url_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl JobRecord {
    /// A freshly accepted job. Records are never created in a terminal state.
    pub fn processing(
        job_id: impl Into<String>,
        website_id: impl Into<String>,
        url_count: usize,
        created_at: DateTime<Utc>,
    ) -> Self {
        let timestamp = format_timestamp(created_at);
        Self {
            job_id: job_id.into(),
            website_id: website_id.into(),
            status: JobStatus::Processing,
            created_at: timestamp.clone(),
            updated_at: timestamp,
            url_count,
            s3_key: None,
            s3_url: None,
            error_message: None,
        }
    }

    /// Applies `update` in place if the status transition is legal.
    pub fn apply(&mut self, update: &JobUpdate) -> Result<(), TransitionError> {
        let next = update.target_status();
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        self.updated_at = update.updated_at().to_string();
        match update {
            JobUpdate::Complete { s3_key, s3_url, .. } => {
                self.s3_key = Some(s3_key.clone());
                self.s3_url = Some(s3_url.clone());
                self.error_message = None;
            }
            JobUpdate::Failed { error_message, .. } => {
                self.s3_key = None;
                self.s3_url = None;
                self.error_message = Some(error_message.clone());
            }
        }
        Ok(())
    }
}

/// Partial update applied to a `processing` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobUpdate {
    Complete {
        updated_at: String,
        s3_key: String,
        s3_url: String,
    },
    Failed {
        updated_at: String,
        error_message: String,
    },
}

impl JobUpdate {
    pub fn target_status(&self) -> JobStatus {
        match self {
            Self::Complete { .. } => JobStatus::Complete,
            Self::Failed { .. } => JobStatus::Failed,
        }
    }

    /// Status a record must currently hold for this update to apply.
    pub fn expected_status(&self) -> JobStatus {
        JobStatus::Processing
    }

    pub fn updated_at(&self) -> &str {
        match self {
            Self::Complete { updated_at, .. } | Self::Failed { updated_at, .. } => updated_at,
        }
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2026-10-19T08:30:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar date portion used for sitemap `lastmod`.
pub fn format_lastmod(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn complete_update() -> JobUpdate {
        JobUpdate::Complete {
            updated_at: "2026-10-19T08:30:01.000Z".to_string(),
            s3_key: "site1/job-1/sitemap.xml".to_string(),
            s3_url: "https://bucket.s3.amazonaws.com/site1/job-1/sitemap.xml".to_string(),
        }
    }

    #[test]
    fn new_records_start_processing_with_equal_timestamps() {
        let record = JobRecord::processing("job-1", "site1", 2, created_at());

        assert_eq!(record.status, JobStatus::Processing);
        assert_eq!(record.created_at, "2026-10-19T08:30:00.000Z");
        assert_eq!(record.created_at, record.updated_at);
        assert!(record.s3_key.is_none());
    }

    #[test]
    fn status_only_moves_forward() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Complete));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Complete.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Failed.can_transition_to(JobStatus::Complete));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Complete));
        assert!(!JobStatus::Processing.can_transition_to(JobStatus::Processing));
    }

    #[test]
    fn completion_attaches_artifact_location() {
        let mut record = JobRecord::processing("job-1", "site1", 2, created_at());

        record.apply(&complete_update()).expect("transition should apply");

        assert_eq!(record.status, JobStatus::Complete);
        assert_eq!(record.s3_key.as_deref(), Some("site1/job-1/sitemap.xml"));
        assert_eq!(record.updated_at, "2026-10-19T08:30:01.000Z");
        assert!(record.updated_at >= record.created_at);
    }

    #[test]
    fn terminal_records_reject_further_updates() {
        let mut record = JobRecord::processing("job-1", "site1", 2, created_at());
        record.apply(&complete_update()).expect("transition should apply");

        let error = record
            .apply(&JobUpdate::Failed {
                updated_at: "2026-10-19T08:30:02.000Z".to_string(),
                error_message: "late failure".to_string(),
            })
            .expect_err("complete is terminal");

        assert_eq!(error.from, JobStatus::Complete);
        assert_eq!(record.status, JobStatus::Complete);
        assert!(record.error_message.is_none());
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_fields() {
        let record = JobRecord::processing("job-1", "site1", 2, created_at());

        let value = serde_json::to_value(&record).expect("record should serialize");

        assert_eq!(
            value,
            json!({
                "jobId": "job-1",
                "websiteId": "site1",
                "status": "processing",
                "createdAt": "2026-10-19T08:30:00.000Z",
                "updatedAt": "2026-10-19T08:30:00.000Z",
                "urlCount": 2
            })
        );
    }

    #[test]
    fn lastmod_is_date_only() {
        assert_eq!(format_lastmod(created_at()), "2026-10-19");
    }

    #[test]
    fn parses_status_names() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Complete,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(JobStatus::parse("pernding"), None);
    }
}
