//! In-memory `LinkStore` for testing, mirroring the Postgres semantics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StoreError;
use crate::link::{Link, LinkStore, ListFilter, NewLink};

/// Vec-backed store. Rows are kept in insertion order, so reverse iteration
/// gives the same newest-first ordering Postgres produces from `created_at`.
///
/// Counts every store call so tests can assert that rejected requests never
/// touched persistence.
#[derive(Default)]
pub struct MemoryLinkStore {
    links: Mutex<Vec<Link>>,
    calls: AtomicUsize,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of store operations performed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn insert(&self, link: NewLink) -> Result<Link, StoreError> {
        self.record_call();
        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.short_code == link.short_code) {
            return Err(StoreError::DuplicateCode(link.short_code));
        }
        let row = Link {
            short_code: link.short_code,
            long_url: link.long_url,
            clicks: 0,
            created_at: Utc::now(),
        };
        links.push(row.clone());
        Ok(row)
    }

    async fn get(&self, short_code: &str) -> Result<Option<Link>, StoreError> {
        self.record_call();
        let links = self.links.lock().unwrap();
        Ok(links.iter().find(|l| l.short_code == short_code).cloned())
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<Link>, StoreError> {
        self.record_call();
        let links = self.links.lock().unwrap();
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let rows = links
            .iter()
            .rev()
            .filter(|l| match &needle {
                Some(s) => {
                    l.long_url.to_lowercase().contains(s)
                        || l.short_code.to_lowercase().contains(s)
                }
                None => true,
            })
            .take(filter.limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(rows)
    }

    async fn delete(&self, short_code: &str) -> Result<bool, StoreError> {
        self.record_call();
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|l| l.short_code != short_code);
        Ok(links.len() < before)
    }
}
