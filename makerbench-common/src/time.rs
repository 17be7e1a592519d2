//! Timestamp utilities
//!
//! Stored timestamps are RFC 3339 UTC strings with millisecond precision and
//! a `Z` suffix, so lexical order equals chronological order in SQL.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp for storage
pub fn to_db_string(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current timestamp formatted for storage
pub fn now_db_string() -> String {
    to_db_string(now())
}

/// Year/month folder segment (`YYYY/MM`) used to organize uploaded images
pub fn year_month_folder(ts: DateTime<Utc>) -> String {
    format!("{}/{:02}", ts.year(), ts.month())
}
