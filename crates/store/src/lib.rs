//! Persistence layer for short links.
//!
//! The `LinkStore` trait is the seam between the tool layer and storage:
//! `PgLinkStore` talks to Postgres through sqlx, `MemoryLinkStore` backs
//! tests without a database.

pub mod error;
pub mod link;
pub mod memory;
pub mod pg;

pub use error::StoreError;
pub use link::{Link, LinkStore, ListFilter, NewLink};
pub use memory::MemoryLinkStore;
pub use pg::PgLinkStore;
