//! Sitemap XML rendering per the sitemap.org 0.9 protocol.
//!
//! `loc` values come from untrusted callers, so every text node is escaped
//! for the five XML metacharacters before it is written.

use std::fmt;

use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use url::Url;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const SITEMAP_CONTENT_TYPE: &str = "application/xml";

/// How frequently a page is likely to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<url>` element of a sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrlEntry {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: Option<ChangeFrequency>,
    pub priority: Option<f64>,
}

impl SitemapUrlEntry {
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }
}

/// Returns true when `candidate` parses as an absolute URL.
///
/// Purely syntactic: no DNS or network access is involved. The URL parser
/// silently percent-encodes control characters, but `loc` carries the raw
/// string, so any character XML 1.0 cannot represent makes a candidate
/// invalid.
pub fn is_valid_url(candidate: &str) -> bool {
    !candidate.chars().any(is_forbidden_in_xml) && Url::parse(candidate).is_ok()
}

fn is_forbidden_in_xml(c: char) -> bool {
    c.is_control() || matches!(c, '\u{FFFE}' | '\u{FFFF}')
}

/// Renders `entries` as a sitemap document, preserving input order.
///
/// Optional fields that are `None` produce no element at all. A priority of
/// `0.0` is a present value and is rendered as `0`.
pub fn build_sitemap_xml(entries: &[SitemapUrlEntry]) -> String {
    let url_entries = entries
        .iter()
        .map(render_url_entry)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"{SITEMAP_NAMESPACE}\">\n{url_entries}\n</urlset>"
    )
}

fn render_url_entry(entry: &SitemapUrlEntry) -> String {
    let mut rendered = format!("  <url>\n    <loc>{}</loc>\n", escape(entry.loc.as_str()));

    if let Some(lastmod) = &entry.lastmod {
        rendered.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            escape(lastmod.as_str())
        ));
    }

    if let Some(changefreq) = entry.changefreq {
        rendered.push_str(&format!("    <changefreq>{changefreq}</changefreq>\n"));
    }

    if let Some(priority) = entry.priority {
        rendered.push_str(&format!("    <priority>{priority}</priority>\n"));
    }

    rendered.push_str("  </url>");
    rendered
}
