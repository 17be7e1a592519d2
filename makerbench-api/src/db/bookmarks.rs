//! Bookmark queries
//!
//! Public listings page over bookmarks first and only then LEFT JOIN their
//! tags, so a bookmark with many tags never loses tags to the page window.

use std::collections::HashMap;

use makerbench_common::api::{BookmarkTag, BookmarkWithTags, Pagination, ReviewBookmark};
use makerbench_common::db::{Bookmark, BookmarkStatus, NewBookmark};
use makerbench_common::normalize::parse_metadata_safe;
use makerbench_common::time;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::tags::get_or_create_tag_id;
use crate::pagination::PageParams;

/// Filters for approved bookmark listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Free-text query matched against title and description
    pub query: Option<String>,
    /// Normalized tag names; a bookmark matches when it carries ANY of them
    pub tags: Vec<String>,
    pub page: PageParams,
}

/// One page of bookmarks plus pagination bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub(crate) fn new(items: Vec<T>, total: i64, page: PageParams) -> Self {
        let pagination = Pagination::new(total, page.limit, page.offset, items.len());
        Self { items, pagination }
    }

    fn empty(page: PageParams) -> Self {
        Self::new(Vec::new(), 0, page)
    }
}

/// Flat result of the bookmark/tag LEFT JOIN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub tag_id: Option<String>,
    pub tag_name: Option<String>,
}

impl JoinedRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            url: row.try_get("url")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            image_url: row.try_get("image_url")?,
            created_at: row.try_get("created_at")?,
            tag_id: row.try_get("tag_id")?,
            tag_name: row.try_get("tag_name")?,
        })
    }
}

/// Collapse joined rows into one bookmark per id
///
/// Bookmarks keep first-appearance order. Rows with NULL tag columns add no
/// tag, and a tag repeated for the same bookmark is kept once.
pub fn group_rows(rows: Vec<JoinedRow>) -> Vec<BookmarkWithTags> {
    let mut grouped: Vec<BookmarkWithTags> = Vec::new();
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let index = match index_by_id.get(&row.id) {
            Some(&index) => index,
            None => {
                index_by_id.insert(row.id.clone(), grouped.len());
                grouped.push(BookmarkWithTags {
                    id: row.id,
                    url: row.url,
                    title: row.title,
                    description: row.description,
                    image_url: row.image_url,
                    created_at: row.created_at,
                    tags: Vec::new(),
                });
                grouped.len() - 1
            }
        };

        if let (Some(id), Some(name)) = (row.tag_id, row.tag_name) {
            let tags = &mut grouped[index].tags;
            if !tags.iter().any(|t| t.id == id) {
                tags.push(BookmarkTag { id, name });
            }
        }
    }

    grouped
}

/// Escape `\`, `%` and `_` for use inside a LIKE pattern with `ESCAPE '\'`
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Predicates shared by the count and page queries
#[derive(Debug, Default)]
struct Predicates {
    id: Option<String>,
    like: Option<String>,
    /// JSON array of bookmark ids from the tag pre-filter
    ids_json: Option<String>,
}

impl Predicates {
    fn push(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE b.status = ");
        qb.push_bind(BookmarkStatus::Approved.as_str());

        if let Some(id) = &self.id {
            qb.push(" AND b.id = ");
            qb.push_bind(id.clone());
        }
        if let Some(like) = &self.like {
            qb.push(" AND (b.title LIKE ");
            qb.push_bind(like.clone());
            qb.push(" ESCAPE '\\' OR b.description LIKE ");
            qb.push_bind(like.clone());
            qb.push(" ESCAPE '\\')");
        }
        if let Some(ids) = &self.ids_json {
            qb.push(" AND b.id IN (SELECT value FROM json_each(");
            qb.push_bind(ids.clone());
            qb.push("))");
        }
    }
}

/// Ids of approved bookmarks carrying any of `tags`
pub async fn bookmark_ids_with_any_tag(
    pool: &SqlitePool,
    tags: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    if tags.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT DISTINCT b.id FROM bookmarks b \
         JOIN bookmark_tags bt ON bt.bookmark_id = b.id \
         JOIN tags t ON t.id = bt.tag_id \
         WHERE b.status = ",
    );
    qb.push_bind(BookmarkStatus::Approved.as_str());
    qb.push(" AND t.name IN (");
    let mut names = qb.separated(", ");
    for tag in tags {
        names.push_bind(tag.clone());
    }
    names.push_unseparated(")");

    qb.build_query_scalar::<String>().fetch_all(pool).await
}

async fn count_approved(pool: &SqlitePool, predicates: &Predicates) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM bookmarks b");
    predicates.push(&mut qb);
    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

async fn fetch_approved_with_tags(
    pool: &SqlitePool,
    predicates: &Predicates,
    page: Option<PageParams>,
) -> Result<Vec<BookmarkWithTags>, sqlx::Error> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT b.id, b.url, b.title, b.description, b.image_url, b.created_at, \
                t.id AS tag_id, t.name AS tag_name \
         FROM (SELECT b.id, b.url, b.title, b.description, b.image_url, b.created_at \
               FROM bookmarks b",
    );
    predicates.push(&mut qb);
    qb.push(" ORDER BY b.created_at DESC, b.id ASC");
    if let Some(page) = page {
        qb.push(" LIMIT ");
        qb.push_bind(page.limit);
        qb.push(" OFFSET ");
        qb.push_bind(page.offset);
    }
    qb.push(
        ") b \
         LEFT JOIN bookmark_tags bt ON bt.bookmark_id = b.id \
         LEFT JOIN tags t ON t.id = bt.tag_id \
         ORDER BY b.created_at DESC, b.id ASC, t.name ASC",
    );

    let rows = qb.build().fetch_all(pool).await?;
    let joined = rows
        .iter()
        .map(JoinedRow::from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(group_rows(joined))
}

/// Newest approved bookmarks with their tags
pub async fn list_approved(
    pool: &SqlitePool,
    page: PageParams,
) -> Result<Page<BookmarkWithTags>, sqlx::Error> {
    search(
        pool,
        &SearchCriteria {
            page,
            ..Default::default()
        },
    )
    .await
}

/// Approved bookmarks matching free text and/or tags
pub async fn search(
    pool: &SqlitePool,
    criteria: &SearchCriteria,
) -> Result<Page<BookmarkWithTags>, sqlx::Error> {
    let mut predicates = Predicates::default();

    if !criteria.tags.is_empty() {
        let ids = bookmark_ids_with_any_tag(pool, &criteria.tags).await?;
        if ids.is_empty() {
            debug!(tags = ?criteria.tags, "No approved bookmarks carry the requested tags");
            return Ok(Page::empty(criteria.page));
        }
        predicates.ids_json = Some(serde_json::Value::from(ids).to_string());
    }

    if let Some(q) = criteria.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        predicates.like = Some(format!("%{}%", escape_like(q)));
    }

    let total = count_approved(pool, &predicates).await?;
    let items = fetch_approved_with_tags(pool, &predicates, Some(criteria.page)).await?;

    debug!(
        total,
        returned = items.len(),
        limit = criteria.page.limit,
        offset = criteria.page.offset,
        "Bookmark page fetched"
    );

    Ok(Page::new(items, total, criteria.page))
}

/// A single approved bookmark with its tags
pub async fn get_approved(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<BookmarkWithTags>, sqlx::Error> {
    let predicates = Predicates {
        id: Some(id.to_string()),
        ..Default::default()
    };
    let mut found = fetch_approved_with_tags(pool, &predicates, None).await?;
    Ok(found.pop())
}

/// Id of any bookmark (any status) stored under `normalized_url`
pub async fn find_id_by_url(
    pool: &SqlitePool,
    normalized_url: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM bookmarks WHERE url = ? LIMIT 1")
        .bind(normalized_url)
        .fetch_optional(pool)
        .await
}

/// Result of [`insert_with_tags`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// Another bookmark already holds the URL; nothing was written
    DuplicateUrl,
}

/// Insert a pending bookmark and link its tags in one transaction
///
/// Tags are created on first use; `tag_names` must already be normalized.
/// The URL is checked again by the insert itself, so a submission that
/// raced past an earlier [`find_id_by_url`] still cannot store a duplicate.
pub async fn insert_with_tags(
    pool: &SqlitePool,
    bookmark: &NewBookmark,
    tag_names: &[String],
) -> Result<InsertOutcome, sqlx::Error> {
    let now = time::now_db_string();
    let mut tx = pool.begin().await?;

    // First statement writes, so the transaction takes the write lock here
    let inserted = sqlx::query(
        r#"
        INSERT INTO bookmarks (
            id, url, title, description, status, image_url, image_source,
            submitter_name, submitter_github_url, metadata, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(url) DO NOTHING
        "#,
    )
    .bind(&bookmark.id)
    .bind(&bookmark.url)
    .bind(&bookmark.title)
    .bind(&bookmark.description)
    .bind(BookmarkStatus::Pending.as_str())
    .bind(&bookmark.image_url)
    .bind(bookmark.image_source.map(|s| s.as_str()))
    .bind(&bookmark.submitter_name)
    .bind(&bookmark.submitter_github_url)
    .bind(&bookmark.metadata)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if inserted == 0 {
        tx.rollback().await?;
        return Ok(InsertOutcome::DuplicateUrl);
    }

    for name in tag_names {
        let tag_id = get_or_create_tag_id(&mut tx, name).await?;
        sqlx::query(
            "INSERT OR IGNORE INTO bookmark_tags (id, bookmark_id, tag_id, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(makerbench_common::db::new_id())
        .bind(&bookmark.id)
        .bind(&tag_id)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(InsertOutcome::Inserted)
}

/// Full bookmark row by id, any status
pub async fn get_by_id(pool: &SqlitePool, id: &str) -> makerbench_common::Result<Option<Bookmark>> {
    let sql = format!("SELECT {} FROM bookmarks WHERE id = ?", Bookmark::COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(Bookmark::from_row).transpose()
}

/// Bookmarks in `status`, newest first, for moderation
pub async fn list_by_status(
    pool: &SqlitePool,
    status: BookmarkStatus,
    page: PageParams,
) -> makerbench_common::Result<Page<ReviewBookmark>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookmarks WHERE status = ?")
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "SELECT {} FROM bookmarks WHERE status = ? \
         ORDER BY created_at DESC, id ASC LIMIT ? OFFSET ?",
        Bookmark::COLUMNS
    );
    let rows = sqlx::query(&sql)
        .bind(status.as_str())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;

    let items = rows
        .iter()
        .map(|row| Bookmark::from_row(row).map(review_view))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page::new(items, total, page))
}

/// Change a bookmark's review status
///
/// Approving stamps `approved_at`. Returns `None` when the id is unknown.
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    status: BookmarkStatus,
) -> makerbench_common::Result<Option<ReviewBookmark>> {
    let now = time::now_db_string();

    let result = sqlx::query(
        r#"
        UPDATE bookmarks
        SET status = ?,
            updated_at = ?,
            approved_at = CASE WHEN ? = 'approved' THEN ? ELSE approved_at END
        WHERE id = ?
        "#,
    )
    .bind(status.as_str())
    .bind(&now)
    .bind(status.as_str())
    .bind(&now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(get_by_id(pool, id).await?.map(review_view))
}

/// Moderation view of a full bookmark row
pub fn review_view(bookmark: Bookmark) -> ReviewBookmark {
    ReviewBookmark {
        id: bookmark.id,
        url: bookmark.url,
        title: bookmark.title,
        description: bookmark.description,
        status: bookmark.status,
        image_url: bookmark.image_url,
        submitter_name: bookmark.submitter_name,
        submitter_github_url: bookmark.submitter_github_url,
        created_at: bookmark.created_at,
        approved_at: bookmark.approved_at,
        metadata: parse_metadata_safe(bookmark.metadata.as_deref()),
    }
}
