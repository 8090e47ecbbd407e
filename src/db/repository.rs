//! Key/value repository backing the document snapshot.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::RevisionInfo;

/// Repository over the `kv_store` table and the revision counter.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Read the raw value stored under `key`.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    /// Overwrite the value under `key` and bump the revision in one transaction.
    ///
    /// Returns the new revision ID.
    pub async fn put_value(&self, key: &str, value: &str) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&mut *tx)
            .await?;
        let revision_id: i64 = row.get("revision_id");

        tx.commit().await?;

        Ok(revision_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn test_repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .unwrap();
        (Repository::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let (repo, _dir) = test_repo().await;
        assert_eq!(repo.get_value("diabetesAppState").await.unwrap(), None);
        assert_eq!(repo.get_revision_id().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_put_overwrites_and_bumps_revision() {
        let (repo, _dir) = test_repo().await;

        let first = repo.put_value("k", "{\"a\":1}").await.unwrap();
        let second = repo.put_value("k", "{\"a\":2}").await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(
            repo.get_value("k").await.unwrap().as_deref(),
            Some("{\"a\":2}")
        );
        assert_eq!(repo.get_revision_info().await.unwrap().revision_id, 2);
    }
}
