//! Common error types for MakerBench

use thiserror::Error;

/// Common result type for MakerBench operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the service and its tooling
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tag name empty or malformed after normalization
    #[error("Tag validation error: {0}")]
    TagValidation(String),

    /// Stored metadata JSON could not be parsed
    #[error("Metadata parse error: {0}")]
    MetadataParse(String),

    /// Metadata could not be serialized to JSON
    #[error("Metadata stringify error: {0}")]
    MetadataStringify(String),
}
