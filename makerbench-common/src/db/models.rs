//! Database models

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

/// Generate a new record id (UUIDv4 string)
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Review status of a submitted bookmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl BookmarkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkStatus::Pending => "pending",
            BookmarkStatus::Approved => "approved",
            BookmarkStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BookmarkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookmarkStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookmarkStatus::Pending),
            "approved" => Ok(BookmarkStatus::Approved),
            "rejected" => Ok(BookmarkStatus::Rejected),
            other => Err(Error::InvalidInput(format!(
                "Invalid status '{}' (expected pending, approved or rejected)",
                other
            ))),
        }
    }
}

/// Where a bookmark's preview image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// `og:image` meta tag of the submitted page
    Og,
    /// Captured screenshot uploaded to the image host
    Screenshot,
    /// No image could be obtained; the UI renders a placeholder
    Fallback,
}

impl ImageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSource::Og => "og",
            ImageSource::Screenshot => "screenshot",
            ImageSource::Fallback => "fallback",
        }
    }
}

impl FromStr for ImageSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "og" => Ok(ImageSource::Og),
            "screenshot" => Ok(ImageSource::Screenshot),
            "fallback" => Ok(ImageSource::Fallback),
            other => Err(Error::InvalidInput(format!("Invalid image source '{}'", other))),
        }
    }
}

/// Full bookmark row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: BookmarkStatus,
    pub image_url: Option<String>,
    pub image_source: Option<ImageSource>,
    pub submitter_name: Option<String>,
    pub submitter_github_url: Option<String>,
    pub metadata: Option<String>,
    pub created_at: String,
    pub approved_at: Option<String>,
    pub updated_at: String,
}

impl Bookmark {
    /// Column list matching [`Bookmark::from_row`]
    pub const COLUMNS: &'static str = "id, url, title, description, status, image_url, \
         image_source, submitter_name, submitter_github_url, metadata, created_at, \
         approved_at, updated_at";

    /// Build from a row selected with [`Bookmark::COLUMNS`]
    pub fn from_row(row: &SqliteRow) -> crate::Result<Self> {
        let status: String = row.try_get("status")?;
        let image_source: Option<String> = row.try_get("image_source")?;

        Ok(Self {
            id: row.try_get("id")?,
            url: row.try_get("url")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status: status.parse()?,
            image_url: row.try_get("image_url")?,
            image_source: image_source
                .as_deref()
                .map(str::parse::<ImageSource>)
                .transpose()?,
            submitter_name: row.try_get("submitter_name")?,
            submitter_github_url: row.try_get("submitter_github_url")?,
            metadata: row.try_get("metadata")?,
            created_at: row.try_get("created_at")?,
            approved_at: row.try_get("approved_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Values for a new bookmark row
#[derive(Debug, Clone, Default)]
pub struct NewBookmark {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_source: Option<ImageSource>,
    pub submitter_name: Option<String>,
    pub submitter_github_url: Option<String>,
    pub metadata: Option<String>,
}

/// Tag definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl Tag {
    pub fn from_row(row: &SqliteRow) -> crate::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Tag with the number of approved bookmarks carrying it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagCount {
    pub tag: Tag,
    pub count: i64,
}
