//! DynamoDB-backed job store.
//!
//! Items use the same camelCase attribute names as the JSON job record so the
//! status endpoint returns what is stored.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use sitemap_core::job::{JobRecord, JobStatus, JobUpdate};
use tracing::debug;

use super::job_store::JobStore;
use super::StoreError;

pub const JOB_ID_ATTRIBUTE: &str = "jobId";

type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone)]
pub struct DynamoJobStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoJobStore {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl JobStore for DynamoJobStore {
    async fn create_job(&self, record: &JobRecord) -> Result<(), StoreError> {
        debug!(table = %self.table_name, job_id = %record.job_id, "put_item");
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .condition_expression("attribute_not_exists(jobId)")
            .send()
            .await
            .map_err(|error| {
                let service_error = error.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    StoreError::AlreadyExists(record.job_id.clone())
                } else {
                    StoreError::backend("dynamodb put_item", DisplayErrorContext(&service_error))
                }
            })?;
        Ok(())
    }

    async fn update_job(&self, job_id: &str, update: &JobUpdate) -> Result<(), StoreError> {
        debug!(
            table = %self.table_name,
            job_id,
            status = %update.target_status(),
            "update_item"
        );
        let request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(JOB_ID_ATTRIBUTE, string_value(job_id))
            .condition_expression("#status = :expected")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(":expected", string_value(update.expected_status().as_str()))
            .expression_attribute_values(":status", string_value(update.target_status().as_str()))
            .expression_attribute_values(":updatedAt", string_value(update.updated_at()));

        let request = match update {
            JobUpdate::Complete { s3_key, s3_url, .. } => request
                .update_expression(
                    "SET #status = :status, updatedAt = :updatedAt, s3Key = :s3Key, s3Url = :s3Url REMOVE errorMessage",
                )
                .expression_attribute_values(":s3Key", string_value(s3_key))
                .expression_attribute_values(":s3Url", string_value(s3_url)),
            JobUpdate::Failed { error_message, .. } => request
                .update_expression(
                    "SET #status = :status, updatedAt = :updatedAt, errorMessage = :errorMessage REMOVE s3Key, s3Url",
                )
                .expression_attribute_values(":errorMessage", string_value(error_message)),
        };

        request.send().await.map_err(|error| {
            let service_error = error.into_service_error();
            if service_error.is_conditional_check_failed_exception() {
                StoreError::ConditionFailed {
                    job_id: job_id.to_string(),
                    expected: update.expected_status(),
                }
            } else {
                StoreError::backend("dynamodb update_item", DisplayErrorContext(&service_error))
            }
        })?;
        Ok(())
    }

    async fn get_job(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        debug!(table = %self.table_name, job_id, "get_item");
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(JOB_ID_ATTRIBUTE, string_value(job_id))
            .consistent_read(true)
            .send()
            .await
            .map_err(|error| {
                StoreError::backend(
                    "dynamodb get_item",
                    DisplayErrorContext(&error.into_service_error()),
                )
            })?;

        output.item().map(record_from_item).transpose()
    }
}

fn string_value(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

pub fn record_to_item(record: &JobRecord) -> Item {
    let mut item = HashMap::from([
        (JOB_ID_ATTRIBUTE.to_string(), string_value(&record.job_id)),
        ("websiteId".to_string(), string_value(&record.website_id)),
        ("status".to_string(), string_value(record.status.as_str())),
        ("createdAt".to_string(), string_value(&record.created_at)),
        ("updatedAt".to_string(), string_value(&record.updated_at)),
        (
            "urlCount".to_string(),
            AttributeValue::N(record.url_count.to_string()),
        ),
    ]);

    let optional = [
        ("s3Key", &record.s3_key),
        ("s3Url", &record.s3_url),
        ("errorMessage", &record.error_message),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            item.insert(name.to_string(), string_value(value));
        }
    }

    item
}

pub fn record_from_item(item: &Item) -> Result<JobRecord, StoreError> {
    let status_raw = required_string(item, "status")?;
    let status = JobStatus::parse(&status_raw)
        .ok_or_else(|| StoreError::MalformedRecord(format!("unknown status '{status_raw}'")))?;
    let url_count_raw = item
        .get("urlCount")
        .ok_or_else(|| StoreError::MalformedRecord("missing attribute 'urlCount'".to_string()))?
        .as_n()
        .map_err(|_| StoreError::MalformedRecord("'urlCount' must be a number".to_string()))?;
    let url_count = url_count_raw.parse::<usize>().map_err(|error| {
        StoreError::MalformedRecord(format!("invalid urlCount '{url_count_raw}': {error}"))
    })?;

    Ok(JobRecord {
        job_id: required_string(item, JOB_ID_ATTRIBUTE)?,
        website_id: required_string(item, "websiteId")?,
        status,
        created_at: required_string(item, "createdAt")?,
        updated_at: required_string(item, "updatedAt")?,
        url_count,
        s3_key: optional_string(item, "s3Key")?,
        s3_url: optional_string(item, "s3Url")?,
        error_message: optional_string(item, "errorMessage")?,
    })
}

fn required_string(item: &Item, name: &str) -> Result<String, StoreError> {
    optional_string(item, name)?
        .ok_or_else(|| StoreError::MalformedRecord(format!("missing attribute '{name}'")))
}

fn optional_string(item: &Item, name: &str) -> Result<Option<String>, StoreError> {
    match item.get(name) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(value) => value
            .as_s()
            .map(|text| Some(text.clone()))
            .map_err(|_| StoreError::MalformedRecord(format!("'{name}' must be a string"))),
    }
}
