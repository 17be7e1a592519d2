//! Database queries for makerbench-api
//!
//! Schema creation and migrations live in `makerbench_common::db`; this
//! module holds the queries the HTTP handlers run.

pub mod bookmarks;
pub mod tags;

pub use bookmarks::{group_rows, list_approved, search, JoinedRow, Page, SearchCriteria};
