//! Page metadata extraction
//!
//! Fetches a submitted page and reads its title, description and Open Graph
//! image from the `<head>` markup.

use std::collections::HashMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ServiceError;

const USER_AGENT: &str = "MakerBench/1.0 (Bookmark Metadata Extractor)";

static META_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<meta\b([^>]*)>").expect("meta tag pattern is valid")
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)([a-z_:.-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
        .expect("attribute pattern is valid")
});

static TITLE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title\b[^>]*>(.*?)</title>").expect("title pattern is valid")
});

/// Metadata read from a page; failures are reported in `error`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageMetadata {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Extract title, description and `og:image` from HTML
///
/// `og:title` wins over `<title>`, and `og:description` over
/// `meta[name=description]`. Empty values count as absent.
pub fn parse_html_metadata(html: &str) -> PageMetadata {
    let mut by_property: HashMap<String, String> = HashMap::new();
    let mut by_name: HashMap<String, String> = HashMap::new();

    for tag in META_TAG.captures_iter(html) {
        let attrs = parse_attributes(&tag[1]);
        let Some(content) = attrs.get("content") else {
            continue;
        };
        if let Some(property) = attrs.get("property") {
            by_property
                .entry(property.to_ascii_lowercase())
                .or_insert_with(|| content.clone());
        }
        if let Some(name) = attrs.get("name") {
            by_name
                .entry(name.to_ascii_lowercase())
                .or_insert_with(|| content.clone());
        }
    }

    let pick = |map: &HashMap<String, String>, key: &str| {
        map.get(key)
            .map(|v| decode_text(v))
            .filter(|v| !v.is_empty())
    };

    let page_title = TITLE_TAG
        .captures(html)
        .map(|c| decode_text(&c[1]))
        .filter(|t| !t.is_empty());

    PageMetadata {
        title: pick(&by_property, "og:title").or(page_title),
        description: pick(&by_property, "og:description").or_else(|| pick(&by_name, "description")),
        og_image: pick(&by_property, "og:image"),
        error: None,
    }
}

fn parse_attributes(raw: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(raw)
        .filter_map(|c| {
            let value = c.get(2).or_else(|| c.get(3)).or_else(|| c.get(4))?;
            Some((c[1].to_ascii_lowercase(), value.as_str().to_string()))
        })
        .collect()
}

/// Decode named and numeric character references, then trim
fn decode_text(raw: &str) -> String {
    html_escape::decode_html_entities(raw).trim().to_string()
}

/// HTTP client that fetches pages for metadata extraction
#[derive(Debug, Clone)]
pub struct MetadataClient {
    http_client: reqwest::Client,
}

impl MetadataClient {
    pub fn new(timeout: Duration) -> Result<Self, ServiceError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Client(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Fetch `url` and extract its metadata
    ///
    /// Never fails: network errors and non-2xx statuses are reported in
    /// [`PageMetadata::error`].
    pub async fn extract(&self, url: &str) -> PageMetadata {
        tracing::debug!(url = %url, "Fetching page metadata");

        let response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return PageMetadata::failed(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return PageMetadata::failed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ));
        }

        match response.text().await {
            Ok(html) => parse_html_metadata(&html),
            Err(e) => PageMetadata::failed(e.to_string()),
        }
    }
}
