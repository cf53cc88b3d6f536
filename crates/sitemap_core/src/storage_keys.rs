pub const SITEMAP_FILE_NAME: &str = "sitemap.xml";

/// Object key for a job's sitemap artifact: `{website_id}/{job_id}/sitemap.xml`.
pub fn sitemap_object_key(website_id: &str, job_id: &str) -> String {
    format!(
        "{}/{}/{SITEMAP_FILE_NAME}",
        website_id.trim_matches('/'),
        job_id
    )
}

/// Virtual-hosted style S3 endpoint for `bucket`.
pub fn default_public_base_url(bucket: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com")
}

pub fn public_object_url(base_url: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_sitemap_key_from_website_and_job() {
        let key = sitemap_object_key("site1", "4f1c2a9e-job");
        assert_eq!(key, "site1/4f1c2a9e-job/sitemap.xml");
    }

    #[test]
    fn sitemap_key_strips_surrounding_slashes_from_website() {
        let key = sitemap_object_key("/site1/", "job-1");
        assert_eq!(key, "site1/job-1/sitemap.xml");
    }

    #[test]
    fn builds_default_public_url() {
        let url = public_object_url(
            &default_public_base_url("sitemaps-bucket"),
            "site1/job-1/sitemap.xml",
        );
        assert_eq!(
            url,
            "https://sitemaps-bucket.s3.amazonaws.com/site1/job-1/sitemap.xml"
        );
    }

    #[test]
    fn public_url_joins_without_double_slash() {
        let url = public_object_url("https://cdn.example.com/", "/site1/job-1/sitemap.xml");
        assert_eq!(url, "https://cdn.example.com/site1/job-1/sitemap.xml");
    }
}
