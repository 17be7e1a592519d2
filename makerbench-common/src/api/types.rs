//! Shared API request/response types
//!
//! The service and the typed client both use these, so the wire format is
//! defined in exactly one place. Field names are camelCase on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::{BookmarkStatus, Tag, TagCount};
use crate::normalize::Metadata;

// ========================================
// Envelope Types
// ========================================

/// Successful response envelope: `{"success": true, "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Per-field validation messages (`{"url": ["Please enter a valid URL"]}`)
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Failed response envelope: `{"success": false, "error": "...", "details"?: {...}}`
///
/// # Examples
///
/// ```
/// use makerbench_common::api::types::ErrorEnvelope;
///
/// let body = ErrorEnvelope::new("Invalid limit parameter");
/// assert!(!body.success);
/// assert!(body.details.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    /// Human-readable error message
    pub error: String,
    /// Per-field validation messages (validation failures only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: FieldErrors) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: Some(details),
        }
    }
}

// ========================================
// Bookmark Types
// ========================================

/// Tag reference nested in a bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkTag {
    pub id: String,
    pub name: String,
}

/// Public view of an approved bookmark with its tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkWithTags {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub tags: Vec<BookmarkTag>,
}

/// Pagination bookkeeping returned with every list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl Pagination {
    /// Build pagination metadata for a page of `returned` items
    ///
    /// More results exist while `offset + returned` has not reached `total`.
    pub fn new(total: i64, limit: i64, offset: i64, returned: usize) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset + (returned as i64) < total,
        }
    }
}

/// Data payload of list and search responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarksPage {
    pub bookmarks: Vec<BookmarkWithTags>,
    pub pagination: Pagination,
}

/// Body of `POST /api/bookmarks`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookmarkRequest {
    pub url: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter_github_url: Option<String>,
}

/// Data payload of a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookmarkResponse {
    pub bookmark_id: String,
    pub message: String,
}

// ========================================
// Tag Types
// ========================================

/// Data payload of tag listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagsPage {
    pub tags: Vec<Tag>,
    pub pagination: Pagination,
}

/// Data payload of `GET /api/tags/popular`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularTags {
    pub tags: Vec<TagCount>,
}

// ========================================
// Admin Types
// ========================================

/// Body of `POST /api/admin/bookmarks/:id/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookmarkStatus,
}

/// Admin view of a bookmark, any status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewBookmark {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: BookmarkStatus,
    pub image_url: Option<String>,
    pub submitter_name: Option<String>,
    pub submitter_github_url: Option<String>,
    pub created_at: String,
    pub approved_at: Option<String>,
    /// Enrichment details; `None` when absent or unreadable
    pub metadata: Option<Metadata>,
}

/// Data payload of admin review listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage {
    pub bookmarks: Vec<ReviewBookmark>,
    pub pagination: Pagination,
}

/// Health check payload (served bare, without the envelope)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

// ========================================
// Tests
// ========================================
