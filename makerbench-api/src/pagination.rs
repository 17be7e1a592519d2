//! Pagination parameter parsing
//!
//! `limit` and `offset` arrive as raw query-string text so that malformed
//! values can be reported as 400s naming the offending parameter instead of
//! a generic extractor rejection.

use serde::Deserialize;
use thiserror::Error;

/// Page size used when the request does not specify `limit`
pub const DEFAULT_LIMIT: i64 = 20;

/// Largest page size served; larger requests are capped
pub const MAX_LIMIT: i64 = 100;

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Validated pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Malformed pagination parameter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageParamError {
    #[error("Invalid limit parameter: must be a positive integer")]
    InvalidLimit,

    #[error("Invalid offset parameter: must be a non-negative integer")]
    InvalidOffset,
}

impl PageParams {
    /// Parse `limit` and `offset`, applying defaults and the limit cap
    ///
    /// Missing or empty values take their defaults. `limit` must be an
    /// integer >= 1 and is capped at [`MAX_LIMIT`]; `offset` must be an
    /// integer >= 0.
    ///
    /// # Examples
    /// ```
    /// use makerbench_api::pagination::{PageParams, PageParamError};
    ///
    /// let p = PageParams::parse(Some("500"), None).unwrap();
    /// assert_eq!(p.limit, 100);
    /// assert_eq!(p.offset, 0);
    ///
    /// assert_eq!(PageParams::parse(Some("abc"), None), Err(PageParamError::InvalidLimit));
    /// ```
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self, PageParamError> {
        let limit = match non_empty(limit) {
            None => DEFAULT_LIMIT,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n.min(MAX_LIMIT),
                _ => return Err(PageParamError::InvalidLimit),
            },
        };

        let offset = match non_empty(offset) {
            None => 0,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 0 => n,
                _ => return Err(PageParamError::InvalidOffset),
            },
        };

        Ok(Self { limit, offset })
    }

    /// Parse from a [`PageQuery`]
    pub fn from_query(query: &PageQuery) -> Result<Self, PageParamError> {
        Self::parse(query.limit.as_deref(), query.offset.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
