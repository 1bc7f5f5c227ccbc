//! Error types for the store crate.

/// Errors surfaced by a `LinkStore` implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Insert hit the primary-key constraint on `short_code`.
    #[error("Short code already in use: {0}")]
    DuplicateCode(String),

    /// Any other database failure.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
