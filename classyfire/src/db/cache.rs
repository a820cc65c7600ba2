//! Classification cache table operations
//!
//! Rows are keyed by `(kind, identifier)`. `payload` holds the compound JSON,
//! NULL for an empty classification.

use crate::error::{ClassyFireError, Result};
use crate::models::{Classification, Compound, Identifier};
use crate::services::cache::CacheStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::path::Path;

/// SQLite-backed cache store
pub struct SqliteCacheStore {
    pool: SqlitePool,
}

impl SqliteCacheStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (or create) the cache database inside `cache_dir`
    pub async fn open(cache_dir: &Path) -> Result<Self> {
        let db_path = classyfire_common::db::cache_database_path(cache_dir);
        let pool = classyfire_common::db::init_cache_database(&db_path).await?;
        Ok(Self::new(pool))
    }

    /// Private in-memory store, gone when dropped
    pub async fn in_memory() -> Result<Self> {
        let pool = classyfire_common::db::init_memory_database().await?;
        Ok(Self::new(pool))
    }

    /// Number of cached entries
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM classification_cache")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)
    }
}

#[async_trait]
impl CacheStore for SqliteCacheStore {
    async fn load(&self, identifier: &Identifier) -> Result<Option<Classification>> {
        let row: Option<(Option<String>,)> = sqlx::query_as(
            "SELECT payload FROM classification_cache WHERE kind = ? AND identifier = ?",
        )
        .bind(identifier.kind().as_str())
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        match row {
            None => Ok(None),
            Some((None,)) => Ok(Some(Classification::Empty)),
            Some((Some(payload),)) => {
                let compound: Compound = serde_json::from_str(&payload).map_err(|e| {
                    ClassyFireError::Storage(format!(
                        "corrupt cache entry for '{}': {}",
                        identifier, e
                    ))
                })?;
                Ok(Some(compound.into()))
            }
        }
    }

    async fn save(&self, identifier: &Identifier, classification: &Classification) -> Result<()> {
        let payload = classification
            .compound()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ClassyFireError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO classification_cache (kind, identifier, payload, cached_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(identifier.kind().as_str())
        .bind(identifier.as_str())
        .bind(payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }
}

fn storage_error(err: sqlx::Error) -> ClassyFireError {
    ClassyFireError::Storage(err.to_string())
}
