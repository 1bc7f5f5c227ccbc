use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::StoreError;

/// A persisted short link. `short_code` is the primary key.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Link {
    pub short_code: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied at creation time. `clicks` starts at 0 and `created_at`
/// is set by the store.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub short_code: String,
    pub long_url: String,
}

/// Query shape for listings: newest first, capped at `limit`, optionally
/// filtered by a case-insensitive substring over `long_url` and `short_code`.
#[derive(Debug, Clone)]
pub struct ListFilter {
    pub limit: i64,
    pub search: Option<String>,
}

/// Storage seam for short links.
///
/// Every call is independent; implementations hold no per-request state.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a new link. Fails with `StoreError::DuplicateCode` when the
    /// code is already taken.
    async fn insert(&self, link: NewLink) -> Result<Link, StoreError>;

    /// Look up a link by its short code.
    async fn get(&self, short_code: &str) -> Result<Option<Link>, StoreError>;

    /// List links newest-first according to the filter.
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Link>, StoreError>;

    /// Delete a link by short code. Returns `true` if a row was removed.
    async fn delete(&self, short_code: &str) -> Result<bool, StoreError>;
}
