//! Admin API authentication via bearer token
//!
//! Review endpoints are protected by a single shared admin token sent as
//! `Authorization: Bearer <token>`. Both sides are hashed with SHA-256
//! before comparison so the comparison time does not depend on how many
//! leading characters of the token were guessed correctly.
//!
//! # Pure Functions
//!
//! No HTTP framework dependencies; the API crate wraps these in middleware.

use sha2::{Digest, Sha256};

// ========================================
// Error Types
// ========================================

/// Admin authentication failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAuthError {
    /// No `Authorization` header present
    MissingToken,

    /// Header present but not of the form `Bearer <token>`
    MalformedHeader,

    /// Token does not match the configured admin token
    InvalidToken,
}

impl std::fmt::Display for AdminAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminAuthError::MissingToken => write!(f, "Missing admin token"),
            AdminAuthError::MalformedHeader => {
                write!(f, "Authorization header must be 'Bearer <token>'")
            }
            AdminAuthError::InvalidToken => write!(f, "Invalid admin token"),
        }
    }
}

impl std::error::Error for AdminAuthError {}

// ========================================
// Validation
// ========================================

/// Extract the token from an `Authorization` header value
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AdminAuthError> {
    let header = header.ok_or(AdminAuthError::MissingToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AdminAuthError::MalformedHeader)?;

    if token.is_empty() {
        return Err(AdminAuthError::MalformedHeader);
    }
    Ok(token)
}

/// Validate an `Authorization` header against the configured admin token
pub fn validate_bearer(header: Option<&str>, expected: &str) -> Result<(), AdminAuthError> {
    let provided = parse_bearer(header)?;

    let provided_digest = Sha256::digest(provided.as_bytes());
    let expected_digest = Sha256::digest(expected.as_bytes());

    if provided_digest == expected_digest {
        Ok(())
    } else {
        Err(AdminAuthError::InvalidToken)
    }
}

// ========================================
// Tests
// ========================================
