//! Catalog Store — read-only access to the `tools` table.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::catalog::ToolRow;

/// Read-only lookup of catalog entries by product name. Missing names are
/// simply absent from the result; row order is unspecified.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn fetch_by_names(&self, names: &[String]) -> Result<Vec<ToolRow>, sqlx::Error>;
}

/// Production implementation backed by PostgreSQL.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn fetch_by_names(&self, names: &[String]) -> Result<Vec<ToolRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM tools WHERE name = ANY($1)")
            .bind(names)
            .fetch_all(&self.pool)
            .await
    }
}
