use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::job::JobStatus;
use crate::sitemap::{is_valid_url, ChangeFrequency, SitemapUrlEntry};

pub const DEFAULT_CHANGE_FREQUENCY: ChangeFrequency = ChangeFrequency::Weekly;
pub const DEFAULT_PRIORITY: f64 = 0.5;
pub const MIN_PRIORITY: f64 = 0.0;
pub const MAX_PRIORITY: f64 = 1.0;

/// Submission payload accepted by the generate operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GenerateSitemapRequest {
    #[serde(default)]
    pub website_id: String,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub priority: Option<f64>,
    #[serde(default)]
    pub changefreq: Option<ChangeFrequency>,
}

/// A request that passed validation, with batch defaults resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGenerateRequest {
    pub website_id: String,
    pub urls: Vec<String>,
    pub priority: f64,
    pub changefreq: ChangeFrequency,
}

impl NormalizedGenerateRequest {
    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    /// Maps every submitted URL to a sitemap entry stamped with `lastmod`.
    pub fn sitemap_entries(&self, lastmod: &str) -> Vec<SitemapUrlEntry> {
        self.urls
            .iter()
            .map(|url| SitemapUrlEntry {
                loc: url.clone(),
                lastmod: Some(lastmod.to_string()),
                changefreq: Some(self.changefreq),
                priority: Some(self.priority),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSitemapResponse {
    pub job_id: String,
    pub website_id: String,
    pub status: JobStatus,
    pub s3_url: String,
    pub url_count: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("websiteId and urls array are required")]
    MissingFields,
    #[error("Invalid URLs detected")]
    InvalidUrls(Vec<String>),
    #[error("priority must be between 0.0 and 1.0")]
    InvalidPriority(f64),
}

impl ValidationError {
    pub fn invalid_urls(&self) -> Option<&[String]> {
        match self {
            Self::InvalidUrls(urls) => Some(urls),
            _ => None,
        }
    }
}

pub fn normalize_request(
    payload: GenerateSitemapRequest,
) -> Result<NormalizedGenerateRequest, ValidationError> {
    let website_id = payload.website_id.trim().to_string();
    // The id becomes the leading key segment, so slashes alone do not count.
    if website_id.trim_matches('/').is_empty() || payload.urls.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    let invalid_urls: Vec<String> = payload
        .urls
        .iter()
        .filter(|url| !is_valid_url(url))
        .cloned()
        .collect();
    if !invalid_urls.is_empty() {
        return Err(ValidationError::InvalidUrls(invalid_urls));
    }

    let priority = payload.priority.unwrap_or(DEFAULT_PRIORITY);
    if !priority.is_finite() || !(MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        return Err(ValidationError::InvalidPriority(priority));
    }

    Ok(NormalizedGenerateRequest {
        website_id,
        urls: payload.urls,
        priority,
        changefreq: payload.changefreq.unwrap_or(DEFAULT_CHANGE_FREQUENCY),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(website_id: &str, urls: &[&str]) -> GenerateSitemapRequest {
        GenerateSitemapRequest {
            website_id: website_id.to_string(),
            urls: urls.iter().map(|url| url.to_string()).collect(),
            priority: None,
            changefreq: None,
        }
    }

    #[test]
    fn normalize_request_applies_batch_defaults() {
        let normalized =
            normalize_request(request("site1", &["https://a.com/", "https://a.com/b"]))
                .expect("request should pass");

        assert_eq!(normalized.url_count(), 2);
        assert_eq!(normalized.priority, DEFAULT_PRIORITY);
        assert_eq!(normalized.changefreq, ChangeFrequency::Weekly);
    }

    #[test]
    fn normalize_request_keeps_explicit_zero_priority() {
        let mut payload = request("site1", &["https://a.com/"]);
        payload.priority = Some(0.0);
        payload.changefreq = Some(ChangeFrequency::Daily);

        let normalized = normalize_request(payload).expect("request should pass");

        assert_eq!(normalized.priority, 0.0);
        assert_eq!(normalized.changefreq, ChangeFrequency::Daily);
    }

    #[test]
    fn normalize_request_rejects_blank_website_id() {
        let error = normalize_request(request("  ", &["https://a.com/"]))
            .expect_err("request should fail");
        assert_eq!(error, ValidationError::MissingFields);
    }

    #[test]
    fn normalize_request_rejects_slash_only_website_id() {
        for website_id in ["/", "//", " / "] {
            let error = normalize_request(request(website_id, &["https://a.com/"]))
                .expect_err("request should fail");
            assert_eq!(error, ValidationError::MissingFields);
        }
    }

    #[test]
    fn normalize_request_reports_urls_with_control_characters() {
        let error = normalize_request(request(
            "site1",
            &["https://a.com/", "https://a.com/a\u{1}b"],
        ))
        .expect_err("request should fail");

        assert_eq!(
            error.invalid_urls(),
            Some(&["https://a.com/a\u{1}b".to_string()][..])
        );
    }

    #[test]
    fn normalize_request_rejects_empty_urls() {
        let error = normalize_request(request("site1", &[])).expect_err("request should fail");
        assert_eq!(error.to_string(), "websiteId and urls array are required");
    }

    #[test]
    fn normalize_request_lists_every_invalid_url_in_order() {
        let error = normalize_request(request(
            "site1",
            &["not-a-url", "https://a.com/", "/relative"],
        ))
        .expect_err("request should fail");

        assert_eq!(
            error.invalid_urls(),
            Some(&["not-a-url".to_string(), "/relative".to_string()][..])
        );
    }

    #[test]
    fn normalize_request_rejects_out_of_range_priority() {
        let mut payload = request("site1", &["https://a.com/"]);
        payload.priority = Some(1.5);

        let error = normalize_request(payload).expect_err("request should fail");

        assert_eq!(error.to_string(), "priority must be between 0.0 and 1.0");
    }

    #[test]
    fn entries_carry_lastmod_and_defaults() {
        let normalized = normalize_request(request("site1", &["https://a.com/"]))
            .expect("request should pass");

        let entries = normalized.sitemap_entries("2026-10-19");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].loc, "https://a.com/");
        assert_eq!(entries[0].lastmod.as_deref(), Some("2026-10-19"));
        assert_eq!(entries[0].priority, Some(0.5));
    }

    #[test]
    fn request_schema_rejects_unknown_changefreq_and_fields() {
        let bad_enum = serde_json::from_value::<GenerateSitemapRequest>(json!({
            "websiteId": "site1",
            "urls": ["https://a.com/"],
            "changefreq": "fortnightly"
        }));
        assert!(bad_enum.is_err());

        let unknown_field = serde_json::from_value::<GenerateSitemapRequest>(json!({
            "websiteId": "site1",
            "urls": ["https://a.com/"],
            "lastmod": "2026-10-19"
        }));
        assert!(unknown_field.is_err());
    }

    #[test]
    fn request_schema_defaults_missing_fields() {
        let parsed = serde_json::from_value::<GenerateSitemapRequest>(json!({}))
            .expect("empty object should parse");

        assert_eq!(parsed, request("", &[]));
    }
}
