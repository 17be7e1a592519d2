//! Integration tests for on-disk database initialization
//!
//! Covers first-run creation, reopening an existing database, and the
//! schema version recorded by migrations.

use makerbench_common::db::init::init_database;
use makerbench_common::db::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("makerbench.db");
    assert!(!db_path.exists());

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing_and_keeps_data() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("makerbench.db");

    let pool = init_database(&db_path).await.unwrap();
    sqlx::query("INSERT INTO tags (id, name) VALUES ('t1', 'rust')")
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let name: String = sqlx::query_scalar("SELECT name FROM tags WHERE id = 't1'")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(name, "rust");
}

#[tokio::test]
async fn test_schema_version_recorded() {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("makerbench.db")).await.unwrap();

    assert_eq!(get_schema_version(&pool).await.unwrap(), CURRENT_SCHEMA_VERSION);
}
