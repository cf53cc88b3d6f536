use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use sitemap_lambda::adapters::dynamo::DynamoJobStore;
use sitemap_lambda::adapters::job_store::JobStore;
use sitemap_lambda::config::StatusConfig;
use sitemap_lambda::handlers::response::ApiGatewayResponse;
use sitemap_lambda::handlers::status::handle_status_event;
use sitemap_lambda::logging::init_tracing;

async fn handle_request(
    event: LambdaEvent<Value>,
    job_store: &dyn JobStore,
) -> Result<ApiGatewayResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, "status request received");
    Ok(handle_status_event(event.payload, job_store).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = StatusConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let job_store = DynamoJobStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.table_name.clone(),
    );
    tracing::info!(table = %config.table_name, "status lambda initialized");

    let job_store: &dyn JobStore = &job_store;
    lambda_runtime::run(service_fn(move |event| handle_request(event, job_store))).await
}
