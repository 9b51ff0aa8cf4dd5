//! Comparison Cache — persisted previously-computed comparisons in the
//! `queries` table, keyed by canonical query string.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use crate::models::comparison::CachedComparisonRow;

/// Point lookup and insert-only store for computed comparisons.
///
/// `lookup` is exact string equality on the canonical query — "A vs B" and
/// "B vs A" are distinct keys. `store` is NOT idempotent: two calls with the
/// same key create two independent rows (no upsert, no uniqueness
/// constraint), matching source behavior.
#[async_trait]
pub trait ComparisonCache: Send + Sync {
    async fn lookup(&self, canonical_query: &str)
        -> Result<Option<CachedComparisonRow>, sqlx::Error>;

    async fn store(
        &self,
        canonical_query: &str,
        requester_id: Option<&str>,
        result: &Value,
        tool_names: &[String],
    ) -> Result<(), sqlx::Error>;
}

/// Production implementation backed by PostgreSQL.
#[derive(Clone)]
pub struct PgComparisonCache {
    pool: PgPool,
}

impl PgComparisonCache {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComparisonCache for PgComparisonCache {
    async fn lookup(
        &self,
        canonical_query: &str,
    ) -> Result<Option<CachedComparisonRow>, sqlx::Error> {
        // Duplicate rows are possible; serve the earliest one, which is the
        // record created on the first request for this key.
        sqlx::query_as(
            "SELECT * FROM queries WHERE canonical_query = $1 ORDER BY created_at ASC LIMIT 1",
        )
        .bind(canonical_query)
        .fetch_optional(&self.pool)
        .await
    }

    async fn store(
        &self,
        canonical_query: &str,
        requester_id: Option<&str>,
        result: &Value,
        tool_names: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO queries (canonical_query, requester_id, result, tool_names)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(canonical_query)
        .bind(requester_id)
        .bind(result)
        .bind(tool_names)
        .execute(&self.pool)
        .await?;

        debug!("Cached comparison for key '{canonical_query}'");
        Ok(())
    }
}
