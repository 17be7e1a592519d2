//! Shared HTTP API functionality
//!
//! Wire types used by both the service and the typed client, plus the admin
//! token check.
//!
//! # Design Principle
//!
//! This module contains ONLY pure functions and shared types; the API crate
//! wraps them with framework-specific handlers and middleware.

pub mod auth;
pub mod types;

pub use auth::{parse_bearer, validate_bearer, AdminAuthError};
pub use types::{
    BookmarkTag, BookmarkWithTags, BookmarksPage, ErrorEnvelope, FieldErrors, HealthResponse,
    Pagination, PopularTags, ReviewBookmark, ReviewPage, SubmitBookmarkRequest,
    SubmitBookmarkResponse, SuccessEnvelope, TagsPage, UpdateStatusRequest,
};
