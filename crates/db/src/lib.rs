//! `db` crate — data-access layer for the LightBnB rental site.
//!
//! Provides a connection pool, typed row structs, and repository functions
//! for users, properties and reservations. No business logic lives here:
//! every operation is a single statement against the shared pool.

pub mod config;
pub mod database;
pub mod error;
pub mod pool;
pub mod query;
pub mod repository;
pub mod models;

pub use config::{DbConfig, ReviewJoin};
pub use database::Database;
pub use pool::DbPool;
pub use error::DbError;
