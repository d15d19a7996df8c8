//! Postgres connection pool.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::{DbConfig, DbError};

/// Type alias for the shared Postgres pool used across the whole application.
pub type DbPool = PgPool;

/// Open the process-wide pool. Call once at startup.
///
/// `config.pool_size` controls the pool ceiling.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, DbError> {
    config.validate()?;
    info!(
        host = %config.host,
        database = %config.database,
        "Connecting to database (max_connections={})",
        config.pool_size
    );
    let pool = PgPoolOptions::new()
        .max_connections(config.pool_size)
        .connect_with(config.connect_options())
        .await?;
    Ok(pool)
}

/// Drain the pool at shutdown.
///
/// New acquires fail immediately; resolves once every checked-out
/// connection has been returned and closed.
pub async fn close_pool(pool: &DbPool) {
    info!("Closing database pool ({} open connections)", pool.size());
    pool.close().await;
}
