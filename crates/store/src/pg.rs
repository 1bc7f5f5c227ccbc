//! Postgres-backed `LinkStore` over an sqlx pool.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::link::{Link, LinkStore, ListFilter, NewLink};

/// SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

pub struct PgLinkStore {
    pool: PgPool,
}

impl PgLinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_err(e: sqlx::Error, code: &str) -> StoreError {
    let is_duplicate = e
        .as_database_error()
        .and_then(|db| db.code())
        .map(|c| c == UNIQUE_VIOLATION)
        .unwrap_or(false);
    if is_duplicate {
        StoreError::DuplicateCode(code.to_string())
    } else {
        StoreError::Database(e)
    }
}

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn insert(&self, link: NewLink) -> Result<Link, StoreError> {
        sqlx::query_as::<_, Link>(
            "INSERT INTO links (short_code, long_url, clicks, created_at)
             VALUES ($1, $2, 0, now())
             RETURNING short_code, long_url, clicks, created_at",
        )
        .bind(&link.short_code)
        .bind(&link.long_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, &link.short_code))
    }

    async fn get(&self, short_code: &str) -> Result<Option<Link>, StoreError> {
        let row = sqlx::query_as::<_, Link>(
            "SELECT short_code, long_url, clicks, created_at
             FROM links WHERE short_code = $1",
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Link>, StoreError> {
        let rows = match &filter.search {
            Some(search) => {
                let pattern = format!("%{}%", search);
                sqlx::query_as::<_, Link>(
                    "SELECT short_code, long_url, clicks, created_at
                     FROM links
                     WHERE long_url ILIKE $1 OR short_code ILIKE $1
                     ORDER BY created_at DESC LIMIT $2",
                )
                .bind(&pattern)
                .bind(filter.limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Link>(
                    "SELECT short_code, long_url, clicks, created_at
                     FROM links ORDER BY created_at DESC LIMIT $1",
                )
                .bind(filter.limit)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn delete(&self, short_code: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM links WHERE short_code = $1")
            .bind(short_code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
