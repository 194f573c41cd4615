//! Database access for armory
//!
//! One SQLite file holds the `characters` table. The import CLI opens it
//! read-write; the dashboard opens it read-only.

pub mod characters;

pub use characters::{
    count_characters, ensure_schema, load_all_characters, upsert_character, upsert_characters,
    RefreshColumn, UpsertPolicy,
};

use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "characters.db";

/// Initialize read-write database connection pool
///
/// Creates the parent directory and the database file when missing, then
/// ensures the `characters` table exists.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    tracing::debug!(path = %db_path.display(), "Connecting to database (read-write)");

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Connect to database with read-only mode
///
/// The database must already exist; the dashboard never creates it.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::Config(format!(
            "Database not found: {}. Run armory-import first to create it.",
            db_path.display()
        )));
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    // Verify read-only by attempting a write (should fail)
    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _armory_write_check (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            return Err(Error::Config(
                "Database connection is not read-only".to_string(),
            ));
        }
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_file_and_parent() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("nested").join(DATABASE_FILE);

        let pool = init_database_pool(&db_path).await.expect("init should succeed");
        assert!(db_path.exists());
        assert_eq!(count_characters(&pool).await.unwrap(), 0);
        pool.close().await;
    }

    #[tokio::test]
    async fn test_readonly_missing_database_is_error() {
        let temp = TempDir::new().unwrap();
        let result = connect_readonly(&temp.path().join("absent.db")).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_readonly_rejects_writes() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join(DATABASE_FILE);
        init_database_pool(&db_path).await.unwrap().close().await;

        let pool = connect_readonly(&db_path).await.expect("read-only connect");
        let result = sqlx::query("DELETE FROM characters").execute(&pool).await;
        assert!(result.is_err(), "Write operation should fail in read-only mode");
        pool.close().await;
    }
}
