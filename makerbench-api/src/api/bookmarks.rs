//! Public bookmark endpoints
//!
//! - `GET /api/bookmarks`: newest approved bookmarks
//! - `GET /api/bookmarks/:id`: one approved bookmark
//! - `POST /api/bookmarks`: submit a bookmark for review

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use makerbench_common::api::{
    BookmarkWithTags, BookmarksPage, SubmitBookmarkResponse, SuccessEnvelope,
};
use makerbench_common::db::{new_id, NewBookmark};
use makerbench_common::normalize::stringify_metadata;
use serde_json::Value;
use tracing::info;

use crate::db::bookmarks::{self, InsertOutcome};
use crate::error::{ApiError, ApiResult};
use crate::pagination::{PageParams, PageQuery};
use crate::services::enrich;
use crate::validation::validate_submission;
use crate::AppState;

pub const SUBMITTED_MESSAGE: &str = "Bookmark submitted for review";
pub const DUPLICATE_URL_MESSAGE: &str = "This URL has already been submitted";

/// GET /api/bookmarks?limit=&offset=
pub async fn list_bookmarks(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessEnvelope<BookmarksPage>>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page = PageParams::from_query(&query)?;

    let result = bookmarks::list_approved(&state.db, page).await?;

    Ok(Json(SuccessEnvelope::new(BookmarksPage {
        bookmarks: result.items,
        pagination: result.pagination,
    })))
}

/// GET /api/bookmarks/:id
pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessEnvelope<BookmarkWithTags>>> {
    let bookmark = bookmarks::get_approved(&state.db, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Bookmark not found".to_string()))?;

    Ok(Json(SuccessEnvelope::new(bookmark)))
}

/// POST /api/bookmarks
///
/// Validates the body, rejects already-submitted URLs, enriches the page
/// preview and stores the bookmark as pending with its tags.
pub async fn submit_bookmark(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<SuccessEnvelope<SubmitBookmarkResponse>>)> {
    let body: Value = serde_json::from_slice(&body).map_err(|_| ApiError::Validation {
        message: "Invalid JSON body".to_string(),
        details: None,
    })?;

    let submission = validate_submission(&body).map_err(ApiError::validation)?;

    if bookmarks::find_id_by_url(&state.db, &submission.url)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(DUPLICATE_URL_MESSAGE.to_string()));
    }

    let bookmark_id = new_id();
    let enrichment = enrich(state.preview.as_ref(), &submission.url, &bookmark_id).await;

    let new_bookmark = NewBookmark {
        id: bookmark_id.clone(),
        url: submission.url,
        title: enrichment.title,
        description: enrichment.description,
        image_url: enrichment.image_url,
        image_source: Some(enrichment.image_source),
        submitter_name: submission.submitter_name,
        submitter_github_url: submission.submitter_github_url,
        metadata: Some(stringify_metadata(&enrichment.metadata)?),
    };

    // Enrichment can take a while; a concurrent submission may have won
    let outcome = bookmarks::insert_with_tags(&state.db, &new_bookmark, &submission.tags).await?;
    if outcome == InsertOutcome::DuplicateUrl {
        info!(url = %new_bookmark.url, "Duplicate submission lost the insert race");
        return Err(ApiError::Conflict(DUPLICATE_URL_MESSAGE.to_string()));
    }

    info!(
        bookmark_id = %bookmark_id,
        url = %new_bookmark.url,
        tags = submission.tags.len(),
        "Bookmark submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(SuccessEnvelope::new(SubmitBookmarkResponse {
            bookmark_id,
            message: SUBMITTED_MESSAGE.to_string(),
        })),
    ))
}
