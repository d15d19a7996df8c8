//! Typed error type for the db crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Any failure reported by the store: connectivity, constraint
    /// violations, malformed SQL.
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
