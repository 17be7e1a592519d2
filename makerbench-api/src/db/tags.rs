//! Tag queries

use makerbench_common::db::{new_id, BookmarkStatus, Tag, TagCount};
use makerbench_common::time;
use sqlx::{Row, SqliteConnection, SqlitePool};

use super::bookmarks::{escape_like, Page};
use crate::pagination::PageParams;

/// Id of the tag named `name`, creating it when absent
///
/// `name` must already be normalized.
pub async fn get_or_create_tag_id(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<String, sqlx::Error> {
    sqlx::query(
        "INSERT INTO tags (id, name, created_at) VALUES (?, ?, ?) ON CONFLICT(name) DO NOTHING",
    )
    .bind(new_id())
    .bind(name)
    .bind(time::now_db_string())
    .execute(&mut *conn)
    .await?;

    sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
}

/// All tags, newest first
pub async fn list_tags(
    pool: &SqlitePool,
    page: PageParams,
) -> makerbench_common::Result<Page<Tag>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query(
        "SELECT id, name, description, created_at FROM tags \
         ORDER BY created_at DESC, name ASC LIMIT ? OFFSET ?",
    )
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    let tags = rows.iter().map(Tag::from_row).collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(tags, total, page))
}

/// Tags whose name contains `query`, alphabetical
pub async fn search_tags(
    pool: &SqlitePool,
    query: &str,
    page: PageParams,
) -> makerbench_common::Result<Page<Tag>> {
    let pattern = format!("%{}%", escape_like(query.trim()));

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE name LIKE ? ESCAPE '\\'")
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query(
        "SELECT id, name, description, created_at FROM tags \
         WHERE name LIKE ? ESCAPE '\\' \
         ORDER BY name ASC LIMIT ? OFFSET ?",
    )
    .bind(&pattern)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(pool)
    .await?;

    let tags = rows.iter().map(Tag::from_row).collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(tags, total, page))
}

/// Tags ranked by how many approved bookmarks carry them
///
/// Tags only attached to pending or rejected bookmarks are omitted.
pub async fn popular_tags(
    pool: &SqlitePool,
    limit: i64,
) -> makerbench_common::Result<Vec<TagCount>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name, t.description, t.created_at, COUNT(b.id) AS usage_count
        FROM tags t
        JOIN bookmark_tags bt ON bt.tag_id = t.id
        JOIN bookmarks b ON b.id = bt.bookmark_id
        WHERE b.status = ?
        GROUP BY t.id
        ORDER BY usage_count DESC, t.name ASC
        LIMIT ?
        "#,
    )
    .bind(BookmarkStatus::Approved.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(TagCount {
                tag: Tag::from_row(row)?,
                count: row.try_get("usage_count")?,
            })
        })
        .collect()
}
