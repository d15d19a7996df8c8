//! Repository functions — one function per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! A missing row is `Ok(None)` or an empty `Vec`, never an error.
//! Failures are logged by `#[instrument(err)]` and propagated.

pub mod users;
pub mod reservations;
pub mod properties;

/// Row cap applied when the caller does not choose one.
pub const DEFAULT_LIMIT: u32 = 10;
