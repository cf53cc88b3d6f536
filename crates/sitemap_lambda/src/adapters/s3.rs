use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use sitemap_core::storage_keys::public_object_url;
use tracing::debug;

use super::artifact_store::{ArtifactMetadata, ArtifactStore, StoredArtifact};
use super::StoreError;

#[derive(Debug, Clone)]
pub struct S3ArtifactStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ArtifactStore {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put_artifact(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: &ArtifactMetadata,
    ) -> Result<StoredArtifact, StoreError> {
        debug!(bucket = %self.bucket, key, bytes = body.len(), "put_object");
        let metadata: HashMap<String, String> = metadata
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .set_metadata(Some(metadata))
            .send()
            .await
            .map_err(|error| {
                StoreError::backend(
                    "s3 put_object",
                    DisplayErrorContext(&error.into_service_error()),
                )
            })?;

        Ok(StoredArtifact {
            key: key.to_string(),
            public_url: public_object_url(&self.public_base_url, key),
        })
    }
}
