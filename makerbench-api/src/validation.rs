//! Submission body validation
//!
//! Works on the raw JSON value so that wrong types are reported per field
//! rather than as a single deserialization error.

use makerbench_common::api::FieldErrors;
use makerbench_common::normalize::{normalize_tag_list, parse_and_normalize_url};
use serde_json::Value;

pub const MAX_URL_CHARS: usize = 2000;
pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_CHARS: usize = 50;
pub const MAX_SUBMITTER_NAME_CHARS: usize = 100;

/// A submission that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    /// Normalized URL, used for storage and duplicate detection
    pub url: String,
    /// Normalized, de-duplicated tag names
    pub tags: Vec<String>,
    pub submitter_name: Option<String>,
    pub submitter_github_url: Option<String>,
}

/// Validate a `POST /api/bookmarks` body
///
/// On failure, returns every failing field with its messages.
pub fn validate_submission(body: &Value) -> Result<ValidSubmission, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut fail = |field: &str, message: &str| {
        errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    };

    let url = match body.get("url") {
        Some(Value::String(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                fail("url", "URL is required");
                None
            } else if raw.chars().count() > MAX_URL_CHARS {
                fail("url", "URL must be 2000 characters or less");
                None
            } else {
                let normalized = parse_and_normalize_url(raw);
                if normalized.is_none() {
                    fail("url", "Please enter a valid URL");
                }
                normalized
            }
        }
        Some(Value::Null) | None => {
            fail("url", "URL is required");
            None
        }
        Some(_) => {
            fail("url", "URL must be a string");
            None
        }
    };

    let mut raw_tags: Vec<&str> = Vec::new();
    match body.get("tags") {
        Some(Value::Array(items)) => {
            if items.is_empty() {
                fail("tags", "At least one tag is required");
            } else if items.len() > MAX_TAGS {
                fail("tags", "Maximum 10 tags allowed");
            }
            for item in items {
                match item.as_str() {
                    Some(tag) if tag.trim().is_empty() => fail("tags", "Tag cannot be empty"),
                    Some(tag) if tag.chars().count() > MAX_TAG_CHARS => {
                        fail("tags", "Tag must be 50 characters or less")
                    }
                    Some(tag) => raw_tags.push(tag),
                    None => fail("tags", "Tag must be a string"),
                }
            }
        }
        Some(Value::Null) | None => fail("tags", "At least one tag is required"),
        Some(_) => fail("tags", "Tags must be a list"),
    }

    let submitter_name = match body.get("submitterName") {
        Some(Value::String(name)) if name.chars().count() > MAX_SUBMITTER_NAME_CHARS => {
            fail("submitterName", "Name must be 100 characters or less");
            None
        }
        Some(Value::String(name)) => Some(name.trim().to_string()).filter(|n| !n.is_empty()),
        Some(Value::Null) | None => None,
        Some(_) => {
            fail("submitterName", "Name must be a string");
            None
        }
    };

    let submitter_github_url = match body.get("submitterGithubUrl") {
        Some(Value::String(raw)) if raw.trim().is_empty() => None,
        Some(Value::String(raw)) => {
            let raw = raw.trim();
            if parse_and_normalize_url(raw).is_none() {
                fail("submitterGithubUrl", "Please enter a valid URL");
                None
            } else if !raw.contains("github.com") {
                fail("submitterGithubUrl", "Please enter a valid GitHub URL");
                None
            } else {
                Some(raw.to_string())
            }
        }
        Some(Value::Null) | None => None,
        Some(_) => {
            fail("submitterGithubUrl", "Please enter a valid URL");
            None
        }
    };

    let tags = normalize_tag_list(raw_tags.iter().copied());

    match url {
        Some(url) if errors.is_empty() => Ok(ValidSubmission {
            url,
            tags,
            submitter_name,
            submitter_github_url,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_submission_is_normalized() {
        let valid = validate_submission(&json!({
            "url": "https://Example.com/tool/?b=2&a=1#readme",
            "tags": ["JavaScript", "Dev Tools", "javascript"],
            "submitterName": "Ada",
            "submitterGithubUrl": "https://github.com/ada"
        }))
        .unwrap();

        assert_eq!(valid.url, "https://example.com/tool?a=1&b=2");
        assert_eq!(valid.tags, vec!["javascript", "dev-tools"]);
        assert_eq!(valid.submitter_name.as_deref(), Some("Ada"));
        assert_eq!(valid.submitter_github_url.as_deref(), Some("https://github.com/ada"));
    }

    #[test]
    fn test_missing_fields_reported() {
        let errors = validate_submission(&json!({})).unwrap_err();
        assert_eq!(errors["url"], vec!["URL is required"]);
        assert_eq!(errors["tags"], vec!["At least one tag is required"]);
    }

    #[test]
    fn test_invalid_url() {
        let errors =
            validate_submission(&json!({ "url": "not a url", "tags": ["a"] })).unwrap_err();
        assert_eq!(errors["url"], vec!["Please enter a valid URL"]);
        assert!(!errors.contains_key("tags"));
    }

    #[test]
    fn test_url_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(2000));
        let errors = validate_submission(&json!({ "url": url, "tags": ["a"] })).unwrap_err();
        assert_eq!(errors["url"], vec!["URL must be 2000 characters or less"]);
    }

    #[test]
    fn test_tag_limits() {
        let eleven: Vec<String> = (0..11).map(|i| format!("tag{}", i)).collect();
        let errors =
            validate_submission(&json!({ "url": "https://example.com", "tags": eleven }))
                .unwrap_err();
        assert_eq!(errors["tags"], vec!["Maximum 10 tags allowed"]);

        let errors = validate_submission(&json!({
            "url": "https://example.com",
            "tags": ["", "x".repeat(51)]
        }))
        .unwrap_err();
        assert_eq!(
            errors["tags"],
            vec!["Tag cannot be empty", "Tag must be 50 characters or less"]
        );
    }

    #[test]
    fn test_submitter_fields() {
        let errors = validate_submission(&json!({
            "url": "https://example.com",
            "tags": ["a"],
            "submitterName": "n".repeat(101),
            "submitterGithubUrl": "https://gitlab.com/someone"
        }))
        .unwrap_err();
        assert_eq!(errors["submitterName"], vec!["Name must be 100 characters or less"]);
        assert_eq!(errors["submitterGithubUrl"], vec!["Please enter a valid GitHub URL"]);
    }

    #[test]
    fn test_empty_github_url_is_allowed() {
        let valid = validate_submission(&json!({
            "url": "https://example.com",
            "tags": ["a"],
            "submitterGithubUrl": ""
        }))
        .unwrap();
        assert!(valid.submitter_github_url.is_none());
    }
}
