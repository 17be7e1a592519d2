//! Tag endpoints

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use makerbench_common::api::{PopularTags, SuccessEnvelope, TagsPage};
use makerbench_common::normalize::normalize_tag_name;
use serde::Deserialize;

use crate::db::tags;
use crate::error::{ApiError, ApiResult};
use crate::pagination::{PageParams, PageQuery};
use crate::AppState;

/// Query parameters for tag name search
#[derive(Debug, Deserialize)]
pub struct TagSearchQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// GET /api/tags?limit=&offset=
pub async fn list_tags(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessEnvelope<TagsPage>>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page = PageParams::from_query(&query)?;

    let result = tags::list_tags(&state.db, page).await?;

    Ok(Json(SuccessEnvelope::new(TagsPage {
        tags: result.items,
        pagination: result.pagination,
    })))
}

/// GET /api/tags/popular?limit=
pub async fn popular_tags(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessEnvelope<PopularTags>>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page = PageParams::parse(query.limit.as_deref(), None)?;

    let tags = tags::popular_tags(&state.db, page.limit).await?;

    Ok(Json(SuccessEnvelope::new(PopularTags { tags })))
}

/// GET /api/tags/search?q=&limit=&offset=
///
/// `q` is normalized like a tag name before matching.
pub async fn search_tags(
    State(state): State<AppState>,
    query: Result<Query<TagSearchQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessEnvelope<TagsPage>>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page = PageParams::parse(query.limit.as_deref(), query.offset.as_deref())?;

    let raw = query
        .q
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Missing search query parameter 'q'".to_string()))?;
    // Stored names are normalized, so "Dev Tools" must look for "dev-tools"
    let q = normalize_tag_name(raw)?;

    let result = tags::search_tags(&state.db, &q, page).await?;

    Ok(Json(SuccessEnvelope::new(TagsPage {
        tags: result.items,
        pagination: result.pagination,
    })))
}
