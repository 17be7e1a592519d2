//! HTTP API handlers for makerbench-api

pub mod admin;
pub mod bookmarks;
pub mod health;
pub mod search;
pub mod tags;

use crate::error::ApiError;

pub use admin::{admin_auth, list_for_review, update_status};
pub use bookmarks::{get_bookmark, list_bookmarks, submit_bookmark};
pub use health::health_routes;
pub use search::search_bookmarks;
pub use tags::{list_tags, popular_tags, search_tags};

/// Fallback for GET-only routes
pub async fn get_only() -> ApiError {
    ApiError::MethodNotAllowed(&["GET"])
}

/// Fallback for POST-only routes
pub async fn post_only() -> ApiError {
    ApiError::MethodNotAllowed(&["POST"])
}

/// Fallback for routes serving GET and POST
pub async fn get_or_post() -> ApiError {
    ApiError::MethodNotAllowed(&["GET", "POST"])
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
