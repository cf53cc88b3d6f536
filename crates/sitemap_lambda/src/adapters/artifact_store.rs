use std::collections::BTreeMap;

use async_trait::async_trait;

use super::StoreError;

pub type ArtifactMetadata = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub key: String,
    pub public_url: String,
}

/// Blob storage for generated sitemap documents.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put_artifact(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        metadata: &ArtifactMetadata,
    ) -> Result<StoredArtifact, StoreError>;
}

pub fn sitemap_metadata(website_id: &str, job_id: &str, url_count: usize) -> ArtifactMetadata {
    BTreeMap::from([
        ("websiteId".to_string(), website_id.to_string()),
        ("jobId".to_string(), job_id.to_string()),
        ("urlCount".to_string(), url_count.to_string()),
    ])
}
