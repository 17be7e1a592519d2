//! Typed HTTP client for the MakerBench API
//!
//! Wraps the public endpoints and unwraps the success envelope. Non-2xx
//! responses carrying an error envelope surface its message and details.

use std::time::Duration;

use makerbench_common::api::{
    BookmarksPage, ErrorEnvelope, FieldErrors, SubmitBookmarkRequest, SubmitBookmarkResponse,
    SuccessEnvelope,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Message used when a failed response carries no error envelope
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Server answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Api {
        status: StatusCode,
        message: String,
        details: Option<FieldErrors>,
    },

    /// 2xx response whose body is not the expected envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Parameters for [`MakerBenchClient::get_bookmarks`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GetBookmarksParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Parameters for [`MakerBenchClient::search_bookmarks`]
#[derive(Debug, Clone, Default)]
pub struct SearchBookmarksParams {
    pub q: Option<String>,
    pub tags: Vec<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// MakerBench API client
#[derive(Debug, Clone)]
pub struct MakerBenchClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl MakerBenchClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// GET /api/bookmarks
    pub async fn get_bookmarks(
        &self,
        params: GetBookmarksParams,
    ) -> Result<BookmarksPage, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        push_page(&mut query, params.limit, params.offset);

        let response = self
            .http_client
            .get(format!("{}/api/bookmarks", self.base_url))
            .query(&query)
            .send()
            .await?;

        handle_response(response).await
    }

    /// GET /api/bookmarks/search
    ///
    /// Empty `q` and `tags` are left out of the query string.
    pub async fn search_bookmarks(
        &self,
        params: SearchBookmarksParams,
    ) -> Result<BookmarksPage, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query.push(("q", q.to_string()));
        }
        if !params.tags.is_empty() {
            query.push(("tags", params.tags.join(",")));
        }
        push_page(&mut query, params.limit, params.offset);

        let response = self
            .http_client
            .get(format!("{}/api/bookmarks/search", self.base_url))
            .query(&query)
            .send()
            .await?;

        handle_response(response).await
    }

    /// POST /api/bookmarks
    pub async fn submit_bookmark(
        &self,
        request: &SubmitBookmarkRequest,
    ) -> Result<SubmitBookmarkResponse, ClientError> {
        let response = self
            .http_client
            .post(format!("{}/api/bookmarks", self.base_url))
            .json(request)
            .send()
            .await?;

        handle_response(response).await
    }
}

fn push_page(query: &mut Vec<(&str, String)>, limit: Option<i64>, offset: Option<i64>) {
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(offset) = offset {
        query.push(("offset", offset.to_string()));
    }
}

async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let (message, details) = match serde_json::from_slice::<ErrorEnvelope>(&bytes) {
            Ok(envelope) => (envelope.error, envelope.details),
            Err(_) => (UNEXPECTED_ERROR_MESSAGE.to_string(), None),
        };
        tracing::debug!(status = status.as_u16(), message = %message, "API request failed");
        return Err(ClientError::Api {
            status,
            message,
            details,
        });
    }

    serde_json::from_slice::<SuccessEnvelope<T>>(&bytes)
        .map(|envelope| envelope.data)
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))
}
