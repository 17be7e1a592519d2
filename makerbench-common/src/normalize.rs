//! URL, tag and metadata normalization
//!
//! Submitted URLs are normalized before storage so duplicate submissions of
//! the same page collide on the `url` column. Tag names are normalized so
//! that `"Dev Tools"`, `"dev tools "` and `"DEV   tools"` all map to one tag.

use crate::{Error, Result};
use reqwest::Url;
use serde_json::{Map, Value};

/// Free-form metadata object stored as JSON text on a bookmark
pub type Metadata = Map<String, Value>;

/// Normalize a URL for storage and duplicate checking
///
/// - Lowercases the host and drops default ports (done by the parser)
/// - Removes a trailing slash from non-root paths
/// - Sorts query parameters by key (stable)
/// - Removes the fragment
///
/// Input that does not parse is returned unchanged.
pub fn normalize_url(input: &str) -> String {
    let mut url = match Url::parse(input) {
        Ok(url) => url,
        Err(_) => return input.to_string(),
    };

    let path = url.path().to_string();
    if path != "/" && path.ends_with('/') {
        url.set_path(&path[..path.len() - 1]);
    }

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.set_fragment(None);
    url.to_string()
}

/// Validate that `input` is an absolute http(s) URL and normalize it
///
/// Returns `None` for unparseable input or any other scheme.
pub fn parse_and_normalize_url(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    match url.scheme() {
        "http" | "https" => Some(normalize_url(input)),
        _ => None,
    }
}

/// Normalize a tag name: lowercase, trim, whitespace runs become `-`
pub fn normalize_tag_name(name: &str) -> Result<String> {
    normalize_tag_name_opt(name).ok_or_else(|| {
        Error::TagValidation("Tag name cannot be empty after normalization".to_string())
    })
}

/// Like [`normalize_tag_name`] but returns `None` for empty names
pub fn normalize_tag_name_opt(name: &str) -> Option<String> {
    let normalized = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");

    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Normalize a list of tag names, dropping empties and duplicates
///
/// First-occurrence order is preserved.
pub fn normalize_tag_list<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if let Some(tag) = normalize_tag_name_opt(name) {
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
    }
    out
}

/// Parse a comma-separated `tags` query parameter
pub fn parse_tags_param(raw: &str) -> Vec<String> {
    normalize_tag_list(raw.split(','))
}

/// Parse stored metadata JSON, failing on NULL or malformed input
pub fn parse_metadata(raw: Option<&str>) -> Result<Metadata> {
    let raw = raw.ok_or_else(|| Error::MetadataParse("Metadata is null".to_string()))?;
    serde_json::from_str(raw)
        .map_err(|e| Error::MetadataParse(format!("Failed to parse metadata JSON: {}", e)))
}

/// Parse stored metadata JSON, returning `None` on NULL or malformed input
pub fn parse_metadata_safe(raw: Option<&str>) -> Option<Metadata> {
    parse_metadata(raw).ok()
}

/// Serialize metadata for storage
pub fn stringify_metadata(metadata: &Metadata) -> Result<String> {
    serde_json::to_string(metadata)
        .map_err(|e| Error::MetadataStringify(format!("Failed to stringify metadata: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_lowercases_host_and_drops_default_port() {
        assert_eq!(
            normalize_url("https://Example.COM:443/Tool"),
            "https://example.com/Tool"
        );
        assert_eq!(normalize_url("http://example.com:80/"), "http://example.com/");
    }

    #[test]
    fn test_normalize_url_keeps_non_default_port() {
        assert_eq!(
            normalize_url("http://example.com:8080/app"),
            "http://example.com:8080/app"
        );
    }

    #[test]
    fn test_normalize_url_strips_trailing_slash_except_root() {
        assert_eq!(normalize_url("https://example.com/tool/"), "https://example.com/tool");
        assert_eq!(normalize_url("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn test_normalize_url_sorts_query_and_drops_fragment() {
        assert_eq!(
            normalize_url("https://example.com/search?z=1&a=2&m=3#section"),
            "https://example.com/search?a=2&m=3&z=1"
        );
    }

    #[test]
    fn test_normalize_url_sort_is_stable_for_repeated_keys() {
        assert_eq!(
            normalize_url("https://example.com/?b=2&a=first&a=second"),
            "https://example.com/?a=first&a=second&b=2"
        );
    }

    #[test]
    fn test_normalize_url_returns_unparseable_input_unchanged() {
        assert_eq!(normalize_url("not a url"), "not a url");
    }

    #[test]
    fn test_parse_and_normalize_url_rejects_other_schemes() {
        assert!(parse_and_normalize_url("ftp://example.com/file").is_none());
        assert!(parse_and_normalize_url("javascript:alert(1)").is_none());
        assert!(parse_and_normalize_url("not-a-url").is_none());
        assert_eq!(
            parse_and_normalize_url("https://example.com/tool/").as_deref(),
            Some("https://example.com/tool")
        );
    }

    #[test]
    fn test_normalize_tag_name() {
        assert_eq!(normalize_tag_name("JavaScript").unwrap(), "javascript");
        assert_eq!(normalize_tag_name("  Dev   Tools ").unwrap(), "dev-tools");
        assert!(matches!(normalize_tag_name("   "), Err(Error::TagValidation(_))));
    }

    #[test]
    fn test_parse_tags_param_drops_empties_and_duplicates() {
        assert_eq!(
            parse_tags_param("React, ,javascript,react,,Web Dev"),
            vec!["react", "javascript", "web-dev"]
        );
        assert!(parse_tags_param(" , ").is_empty());
    }

    #[test]
    fn test_metadata_helpers() {
        let parsed = parse_metadata(Some(r#"{"ogImage":"https://x/y.png"}"#)).unwrap();
        assert_eq!(parsed["ogImage"], "https://x/y.png");

        assert!(matches!(parse_metadata(None), Err(Error::MetadataParse(_))));
        assert!(matches!(parse_metadata(Some("{oops")), Err(Error::MetadataParse(_))));
        assert!(parse_metadata_safe(Some("{oops")).is_none());
        assert!(parse_metadata_safe(None).is_none());

        let text = stringify_metadata(&parsed).unwrap();
        assert_eq!(text, r#"{"ogImage":"https://x/y.png"}"#);
    }
}
