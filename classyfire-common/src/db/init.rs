//! Cache database initialization
//!
//! Opens (or creates) the SQLite file backing the classification cache and
//! makes sure the cache table exists. Safe to call on every startup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the cache database inside the cache directory
pub const CACHE_DB_FILENAME: &str = "classyfire_cache.db";

/// Path of the cache database for a given cache directory
pub fn cache_database_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(CACHE_DB_FILENAME)
}

/// Open the cache database at `db_path`, creating file and schema if needed
pub async fn init_cache_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new cache database: {}", db_path.display());
    } else {
        info!("Opened existing cache database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_classification_cache_table(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory cache database
///
/// The pool holds exactly one connection that is never recycled: every
/// SQLite `:memory:` connection is its own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_classification_cache_table(&pool).await?;

    Ok(pool)
}

/// Create the classification cache table
///
/// A NULL `payload` marks an empty classification.
pub async fn create_classification_cache_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classification_cache (
            kind TEXT NOT NULL,
            identifier TEXT NOT NULL,
            payload TEXT,
            cached_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (kind, identifier),
            CHECK (kind IN ('inchikey', 'smiles'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
