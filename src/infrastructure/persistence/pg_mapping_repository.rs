//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

/// Database row for `url_mappings`.
#[derive(Debug, sqlx::FromRow)]
struct MappingRow {
    id: i64,
    code: String,
    long_url: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    hit_count: i64,
}

impl From<MappingRow> for Mapping {
    fn from(row: MappingRow) -> Self {
        Mapping::new(
            row.id,
            row.code,
            row.long_url,
            row.created_at,
            row.expires_at,
            u64::try_from(row.hit_count).unwrap_or_default(),
        )
    }
}

/// PostgreSQL repository for mapping storage and retrieval.
///
/// Uses bound parameters throughout. Code uniqueness is backed by the
/// `url_mappings_code_key` constraint, and hit counting is a single
/// `UPDATE ... SET hit_count = hit_count + 1`, so concurrent redirects never
/// lose increments.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn create(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            INSERT INTO url_mappings (code, long_url, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, code, long_url, created_at, expires_at, hit_count
            "#,
        )
        .bind(&new_mapping.code)
        .bind(&new_mapping.long_url)
        .bind(new_mapping.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, code, long_url, created_at, expires_at, hit_count
            FROM url_mappings
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Mapping>, AppError> {
        // Live rows sort first: NULL expiry, then the latest expiry.
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, code, long_url, created_at, expires_at, hit_count
            FROM url_mappings
            WHERE long_url = $1
            ORDER BY expires_at DESC NULLS FIRST, id DESC
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM url_mappings WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn record_hit(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Mapping>, AppError> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            UPDATE url_mappings
            SET hit_count = hit_count + 1
            WHERE code = $1 AND (expires_at IS NULL OR expires_at >= $2)
            RETURNING id, code, long_url, created_at, expires_at, hit_count
            "#,
        )
        .bind(code)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Mapping::from))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM url_mappings WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM url_mappings WHERE expires_at < $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings WHERE expires_at < $1")
                .bind(now)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
