use serde_json::Value;
use sitemap_core::job::JobRecord;
use tracing::{error, info};

use crate::adapters::job_store::JobStore;
use crate::adapters::StoreError;
use crate::handlers::event::path_parameter;
use crate::handlers::response::{
    bad_request_response, internal_error_response, not_found_response, success_response,
    ApiGatewayResponse,
};

const COMPONENT: &str = "status_handler";
pub const JOB_ID_PARAMETER: &str = "jobId";

pub async fn handle_status_event(event: Value, job_store: &dyn JobStore) -> ApiGatewayResponse {
    let Some(job_id) = path_parameter(&event, JOB_ID_PARAMETER) else {
        return bad_request_response("jobId path parameter is required");
    };

    match get_job_status(&job_id, job_store).await {
        Ok(Some(record)) => success_response(200, &record),
        Ok(None) => not_found_response("Job not found"),
        Err(store_error) => {
            error!(
                component = COMPONENT,
                event = "status_lookup_failed",
                job_id = %job_id,
                error = %store_error
            );
            internal_error_response(&store_error.to_string())
        }
    }
}

/// Point lookup by exact `jobId`. The record is returned as stored.
pub async fn get_job_status(
    job_id: &str,
    job_store: &dyn JobStore,
) -> Result<Option<JobRecord>, StoreError> {
    let record = job_store.get_job(job_id).await?;
    info!(
        component = COMPONENT,
        event = "status_lookup",
        job_id,
        found = record.is_some(),
        status = record.as_ref().map(|r| r.status.as_str()).unwrap_or("missing"),
        terminal = record.as_ref().is_some_and(|r| r.status.is_terminal())
    );
    Ok(record)
}
