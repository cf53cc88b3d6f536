use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value;
use sitemap_core::contract::{
    normalize_request, GenerateSitemapRequest, GenerateSitemapResponse, NormalizedGenerateRequest,
    ValidationError,
};
use sitemap_core::job::{format_lastmod, format_timestamp, JobRecord, JobStatus, JobUpdate};
use sitemap_core::sitemap::{build_sitemap_xml, SITEMAP_CONTENT_TYPE};
use sitemap_core::storage_keys::sitemap_object_key;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::adapters::artifact_store::{sitemap_metadata, ArtifactStore};
use crate::adapters::clock::Clock;
use crate::adapters::job_ids::JobIdSource;
use crate::adapters::job_store::JobStore;
use crate::adapters::StoreError;
use crate::handlers::event::request_payload;
use crate::handlers::response::{
    bad_request_response, internal_error_response, invalid_urls_response, success_response,
    ApiGatewayResponse,
};

const COMPONENT: &str = "generate_handler";

/// Collaborators for the generate workflow, built once per process.
#[derive(Clone, Copy)]
pub struct GenerateDependencies<'a> {
    pub job_store: &'a dyn JobStore,
    pub artifact_store: &'a dyn ArtifactStore,
    pub job_ids: &'a dyn JobIdSource,
    pub clock: &'a dyn Clock,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("failed to create job record: {0}")]
    CreateJob(StoreError),
    #[error("failed to write sitemap artifact: {0}")]
    WriteArtifact(StoreError),
    #[error("failed to mark job complete: {0}")]
    CompleteJob(StoreError),
}

pub async fn handle_generate_event(
    event: Value,
    deps: GenerateDependencies<'_>,
) -> ApiGatewayResponse {
    let payload = match request_payload(event) {
        Ok(value) => value,
        Err(message) => return bad_request_response(&message),
    };

    let request = match serde_json::from_value::<GenerateSitemapRequest>(payload) {
        Ok(value) => value,
        Err(error) => return bad_request_response(&format!("Malformed request: {error}")),
    };

    let normalized = match normalize_request(request) {
        Ok(value) => value,
        Err(error) => {
            warn!(component = COMPONENT, event = "request_rejected", %error);
            return validation_error_response(&error);
        }
    };

    match generate_sitemap(&normalized, deps).await {
        Ok(response) => success_response(200, &response),
        Err(error) => internal_error_response(&error.to_string()),
    }
}

/// Runs a validated submission end to end.
///
/// The job record is persisted as `processing` before any artifact work so a
/// crash leaves a discoverable record. Failures after that point move the
/// record to `failed` before the error is returned.
pub async fn generate_sitemap(
    request: &NormalizedGenerateRequest,
    deps: GenerateDependencies<'_>,
) -> Result<GenerateSitemapResponse, GenerateError> {
    let started_at = Instant::now();
    let job_id = deps.job_ids.next_job_id();
    let created_at = deps.clock.now();
    let job = JobRecord::processing(
        job_id.clone(),
        request.website_id.clone(),
        request.url_count(),
        created_at,
    );

    deps.job_store
        .create_job(&job)
        .await
        .map_err(GenerateError::CreateJob)?;
    info!(
        component = COMPONENT,
        event = "job_created",
        job_id = %job_id,
        website_id = %request.website_id,
        url_count = request.url_count()
    );

    match publish_sitemap(request, &job_id, created_at, deps).await {
        Ok(s3_url) => {
            info!(
                component = COMPONENT,
                event = "job_completed",
                job_id = %job_id,
                duration_ms = started_at.elapsed().as_millis() as u64
            );
            Ok(GenerateSitemapResponse {
                job_id,
                website_id: request.website_id.clone(),
                status: JobStatus::Complete,
                s3_url,
                url_count: request.url_count(),
            })
        }
        Err(failure) => {
            mark_failed(&job_id, created_at, &failure, deps).await;
            error!(
                component = COMPONENT,
                event = "job_failed",
                job_id = %job_id,
                duration_ms = started_at.elapsed().as_millis() as u64,
                error = %failure
            );
            Err(failure)
        }
    }
}

async fn publish_sitemap(
    request: &NormalizedGenerateRequest,
    job_id: &str,
    created_at: DateTime<Utc>,
    deps: GenerateDependencies<'_>,
) -> Result<String, GenerateError> {
    let entries = request.sitemap_entries(&format_lastmod(created_at));
    let xml = build_sitemap_xml(&entries);
    let key = sitemap_object_key(&request.website_id, job_id);
    let metadata = sitemap_metadata(&request.website_id, job_id, request.url_count());

    let artifact = deps
        .artifact_store
        .put_artifact(&key, xml.into_bytes(), SITEMAP_CONTENT_TYPE, &metadata)
        .await
        .map_err(GenerateError::WriteArtifact)?;
    info!(
        component = COMPONENT,
        event = "artifact_written",
        job_id,
        key = %artifact.key
    );

    let update = JobUpdate::Complete {
        updated_at: update_timestamp(deps.clock, created_at),
        s3_key: artifact.key,
        s3_url: artifact.public_url.clone(),
    };
    deps.job_store
        .update_job(job_id, &update)
        .await
        .map_err(GenerateError::CompleteJob)?;

    Ok(artifact.public_url)
}

async fn mark_failed(
    job_id: &str,
    created_at: DateTime<Utc>,
    failure: &GenerateError,
    deps: GenerateDependencies<'_>,
) {
    let update = JobUpdate::Failed {
        updated_at: update_timestamp(deps.clock, created_at),
        error_message: failure.to_string(),
    };
    if let Err(store_error) = deps.job_store.update_job(job_id, &update).await {
        error!(
            component = COMPONENT,
            event = "failure_not_recorded",
            job_id,
            error = %store_error
        );
    }
}

// Never earlier than creation, even if the clock steps backwards.
fn update_timestamp(clock: &dyn Clock, created_at: DateTime<Utc>) -> String {
    format_timestamp(clock.now().max(created_at))
}

fn validation_error_response(error: &ValidationError) -> ApiGatewayResponse {
    match error.invalid_urls() {
        Some(invalid_urls) => invalid_urls_response(&error.to_string(), invalid_urls),
        None => bad_request_response(&error.to_string()),
    }
}
