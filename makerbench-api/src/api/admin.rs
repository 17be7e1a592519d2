//! Moderation endpoints
//!
//! Protected by the admin bearer token. When no token is configured the
//! routes behave as if they did not exist.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Json,
};
use makerbench_common::api::{
    validate_bearer, FieldErrors, ReviewBookmark, ReviewPage, SuccessEnvelope, UpdateStatusRequest,
};
use makerbench_common::db::BookmarkStatus;
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::bookmarks;
use crate::error::{ApiError, ApiResult};
use crate::pagination::PageParams;
use crate::AppState;

/// Admin token middleware
pub async fn admin_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(ApiError::NotFound("Not found".to_string()));
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if let Err(e) = validate_bearer(header, expected) {
        warn!(path = %request.uri().path(), error = %e, "Admin authentication failed");
        return Err(ApiError::Unauthorized(e.to_string()));
    }

    Ok(next.run(request).await)
}

/// Query parameters for the review queue
#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub status: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// GET /api/admin/bookmarks?status=pending
pub async fn list_for_review(
    State(state): State<AppState>,
    query: Result<Query<ReviewQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessEnvelope<ReviewPage>>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page = PageParams::parse(query.limit.as_deref(), query.offset.as_deref())?;

    let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<BookmarkStatus>()?,
        None => BookmarkStatus::Pending,
    };

    let result = bookmarks::list_by_status(&state.db, status, page).await?;

    Ok(Json(SuccessEnvelope::new(ReviewPage {
        bookmarks: result.items,
        pagination: result.pagination,
    })))
}

/// POST /api/admin/bookmarks/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<SuccessEnvelope<ReviewBookmark>>> {
    let value: serde_json::Value = serde_json::from_slice(&body).map_err(|_| ApiError::Validation {
        message: "Invalid JSON body".to_string(),
        details: None,
    })?;

    let request: UpdateStatusRequest = serde_json::from_value(value).map_err(|_| {
        let mut details = FieldErrors::new();
        details.insert(
            "status".to_string(),
            vec!["Status must be one of pending, approved, rejected".to_string()],
        );
        ApiError::validation(details)
    })?;

    let updated = bookmarks::update_status(&state.db, &id, request.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bookmark not found".to_string()))?;

    info!(bookmark_id = %id, status = %request.status, "Bookmark status updated");

    Ok(Json(SuccessEnvelope::new(updated)))
}
