//! # MakerBench Common Library
//!
//! Shared code for the MakerBench service and its clients:
//! - Database schema, models and migrations
//! - API request/response envelope types
//! - Configuration loading
//! - URL, tag and metadata normalization helpers

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod normalize;
pub mod time;

pub use error::{Error, Result};
