use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use sitemap_lambda::adapters::clock::SystemClock;
use sitemap_lambda::adapters::dynamo::DynamoJobStore;
use sitemap_lambda::adapters::job_ids::UuidJobIds;
use sitemap_lambda::adapters::s3::S3ArtifactStore;
use sitemap_lambda::config::GenerateConfig;
use sitemap_lambda::handlers::generate::{handle_generate_event, GenerateDependencies};
use sitemap_lambda::handlers::response::ApiGatewayResponse;
use sitemap_lambda::logging::init_tracing;

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: GenerateDependencies<'_>,
) -> Result<ApiGatewayResponse, Error> {
    tracing::debug!(request_id = %event.context.request_id, "generate request received");
    Ok(handle_generate_event(event.payload, deps).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let config = GenerateConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let job_store = DynamoJobStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.table_name.clone(),
    );
    let artifact_store = S3ArtifactStore::new(
        aws_sdk_s3::Client::new(&aws_config),
        config.bucket_name.clone(),
        config.public_base_url.clone(),
    );
    tracing::info!(
        table = %config.table_name,
        bucket = %config.bucket_name,
        "generate lambda initialized"
    );

    let deps = GenerateDependencies {
        job_store: &job_store,
        artifact_store: &artifact_store,
        job_ids: &UuidJobIds,
        clock: &SystemClock,
    };

    lambda_runtime::run(service_fn(move |event| handle_request(event, deps))).await
}
