//! Bookmark search
//!
//! `GET /api/bookmarks/search?q=&tags=a,b&limit=&offset=`

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use makerbench_common::api::{BookmarksPage, SuccessEnvelope};
use makerbench_common::normalize::parse_tags_param;
use serde::Deserialize;

use crate::db::{bookmarks, SearchCriteria};
use crate::error::{ApiError, ApiResult};
use crate::pagination::PageParams;
use crate::AppState;

/// Query parameters for bookmark search
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    /// Free text matched against title and description
    pub q: Option<String>,
    /// Comma-separated tag names (match ANY)
    pub tags: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SearchQuery {
    /// Validate into search criteria
    pub fn into_criteria(self) -> Result<SearchCriteria, ApiError> {
        let page = PageParams::parse(self.limit.as_deref(), self.offset.as_deref())?;

        let query = self
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        let tags = self.tags.as_deref().map(parse_tags_param).unwrap_or_default();

        Ok(SearchCriteria { query, tags, page })
    }
}

/// GET /api/bookmarks/search
pub async fn search_bookmarks(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessEnvelope<BookmarksPage>>> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let criteria = query.into_criteria()?;

    let result = bookmarks::search(&state.db, &criteria).await?;

    Ok(Json(SuccessEnvelope::new(BookmarksPage {
        bookmarks: result.items,
        pagination: result.pagination,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_trims_query_and_normalizes_tags() {
        let criteria = SearchQuery {
            q: Some("  solder ".to_string()),
            tags: Some("Arduino, ,3D Printing,arduino".to_string()),
            ..Default::default()
        }
        .into_criteria()
        .unwrap();

        assert_eq!(criteria.query.as_deref(), Some("solder"));
        assert_eq!(criteria.tags, vec!["arduino", "3d-printing"]);
        assert_eq!(criteria.page, PageParams::default());
    }

    #[test]
    fn test_blank_query_means_no_text_filter() {
        let criteria = SearchQuery {
            q: Some("   ".to_string()),
            ..Default::default()
        }
        .into_criteria()
        .unwrap();
        assert!(criteria.query.is_none());
        assert!(criteria.tags.is_empty());
    }

    #[test]
    fn test_invalid_offset_is_bad_request() {
        let err = SearchQuery {
            offset: Some("-3".to_string()),
            ..Default::default()
        }
        .into_criteria()
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg.contains("offset")));
    }
}
