//! Error types for makerbench-api
//!
//! Every failure leaving a handler is rendered as the error envelope
//! `{"success": false, "error": "...", "details"?: {...}}`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use makerbench_common::api::{ErrorEnvelope, FieldErrors};
use thiserror::Error;
use tracing::error;

use crate::pagination::PageParamError;

/// Message returned for every 500; the cause is only logged
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed query parameter (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or wrong admin token (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Method not supported on a known route (405)
    #[error("Method not allowed. Allowed: {}", .0.join(", "))]
    MethodNotAllowed(&'static [&'static str]),

    /// Duplicate submission (409)
    #[error("{0}")]
    Conflict(String),

    /// Unparseable or invalid request body (422)
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<FieldErrors>,
    },

    /// Database failure (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// makerbench-common error
    #[error("Common error: {0}")]
    Common(#[from] makerbench_common::Error),

    /// Any other server-side failure (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// 422 with per-field messages
    pub fn validation(details: FieldErrors) -> Self {
        ApiError::Validation {
            message: "Validation failed".to_string(),
            details: Some(details),
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Common(makerbench_common::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Common(
                makerbench_common::Error::InvalidInput(_)
                | makerbench_common::Error::TagValidation(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) | ApiError::Common(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<PageParamError> for ApiError {
    fn from(err: PageParamError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let allow = match &self {
            ApiError::MethodNotAllowed(methods) => Some(methods.join(", ")),
            _ => None,
        };

        let body = if status.is_server_error() {
            error!(error = %self, "Request failed");
            ErrorEnvelope::new(INTERNAL_ERROR_MESSAGE)
        } else {
            match self {
                ApiError::Validation {
                    message,
                    details: Some(details),
                } => ErrorEnvelope::with_details(message, details),
                ApiError::Common(ref err) => ErrorEnvelope::new(common_message(err)),
                other => ErrorEnvelope::new(other.to_string()),
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(value) = allow.and_then(|a| HeaderValue::from_str(&a).ok()) {
            response.headers_mut().insert(header::ALLOW, value);
        }
        response
    }
}

fn common_message(err: &makerbench_common::Error) -> String {
    match err {
        makerbench_common::Error::NotFound(msg)
        | makerbench_common::Error::InvalidInput(msg)
        | makerbench_common::Error::TagValidation(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
