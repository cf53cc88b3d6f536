//! Environment-driven runtime configuration for the Lambda binaries.

use sitemap_core::storage_keys::default_public_base_url;
use thiserror::Error;

pub const TABLE_NAME_VAR: &str = "TABLE_NAME";
pub const BUCKET_NAME_VAR: &str = "BUCKET_NAME";
pub const ARTIFACT_BASE_URL_VAR: &str = "ARTIFACT_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    pub table_name: String,
}

impl StatusConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            table_name: required(&lookup, TABLE_NAME_VAR)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub table_name: String,
    pub bucket_name: String,
    /// Base URL that artifact keys are appended to when building `s3Url`.
    pub public_base_url: String,
}

impl GenerateConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let table_name = required(&lookup, TABLE_NAME_VAR)?;
        let bucket_name = required(&lookup, BUCKET_NAME_VAR)?;
        let public_base_url = optional(&lookup, ARTIFACT_BASE_URL_VAR)
            .unwrap_or_else(|| default_public_base_url(&bucket_name));

        Ok(Self {
            table_name,
            bucket_name,
            public_base_url,
        })
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional(lookup, name).ok_or(ConfigError::Missing(name))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name| values.get(name).cloned()
    }

    #[test]
    fn generate_config_defaults_public_url_to_bucket_endpoint() {
        let config = GenerateConfig::from_lookup(lookup_from(&[
            ("TABLE_NAME", "sitemap-jobs"),
            ("BUCKET_NAME", "sitemaps"),
        ]))
        .expect("config should load");

        assert_eq!(config.public_base_url, "https://sitemaps.s3.amazonaws.com");
    }

    #[test]
    fn generate_config_prefers_explicit_base_url() {
        let config = GenerateConfig::from_lookup(lookup_from(&[
            ("TABLE_NAME", "sitemap-jobs"),
            ("BUCKET_NAME", "sitemaps"),
            ("ARTIFACT_BASE_URL", "https://cdn.example.com"),
        ]))
        .expect("config should load");

        assert_eq!(config.public_base_url, "https://cdn.example.com");
    }

    #[test]
    fn generate_config_requires_bucket() {
        let error = GenerateConfig::from_lookup(lookup_from(&[("TABLE_NAME", "sitemap-jobs")]))
            .expect_err("bucket is required");

        assert_eq!(error.to_string(), "BUCKET_NAME must be configured");
    }

    #[test]
    fn status_config_treats_blank_table_as_missing() {
        let error = StatusConfig::from_lookup(lookup_from(&[("TABLE_NAME", "  ")]))
            .expect_err("blank table is missing");

        assert_eq!(error, ConfigError::Missing(TABLE_NAME_VAR));
    }
}
