//! `Database` — the shared pool plus the listing join policy, with one
//! method per data-access operation.

use crate::{
    DbConfig, DbError, DbPool,
    config::ReviewJoin,
    models::{NewProperty, NewUser, Property, PropertyListing, PropertyQuery, ReservationListing, User},
    pool,
    repository::{properties, reservations, users},
};

/// Long-lived handle owned by the application from startup to shutdown.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
    review_join: ReviewJoin,
}

impl Database {
    /// Open the pool described by `config`.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let pool = pool::create_pool(config).await?;
        Ok(Self::from_pool(pool, config.review_join))
    }

    /// Wrap an already-open pool.
    pub fn from_pool(pool: DbPool, review_join: ReviewJoin) -> Self {
        Self { pool, review_join }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn review_join(&self) -> ReviewJoin {
        self.review_join
    }

    /// Drain and close the pool. Every clone of this handle stops working.
    pub async fn close(&self) {
        pool::close_pool(&self.pool).await;
    }

    pub async fn get_user_with_email(&self, email: &str) -> Result<Option<User>, DbError> {
        users::get_user_with_email(&self.pool, email).await
    }

    pub async fn get_user_with_id(&self, id: i32) -> Result<Option<User>, DbError> {
        users::get_user_with_id(&self.pool, id).await
    }

    pub async fn add_user(&self, user: &NewUser) -> Result<User, DbError> {
        users::add_user(&self.pool, user).await
    }

    /// Completed reservations for `guest_id`; `limit` defaults to 10.
    pub async fn get_all_reservations(
        &self,
        guest_id: i32,
        limit: Option<u32>,
    ) -> Result<Vec<ReservationListing>, DbError> {
        reservations::get_all_reservations(
            &self.pool,
            guest_id,
            limit.unwrap_or(crate::repository::DEFAULT_LIMIT),
            self.review_join,
        )
        .await
    }

    /// Filtered property listing; `limit` defaults to 10.
    pub async fn get_all_properties(
        &self,
        query: &PropertyQuery,
        limit: Option<u32>,
    ) -> Result<Vec<PropertyListing>, DbError> {
        properties::get_all_properties(
            &self.pool,
            query,
            limit.unwrap_or(crate::repository::DEFAULT_LIMIT),
            self.review_join,
        )
        .await
    }

    pub async fn add_property(&self, property: &NewProperty) -> Result<Vec<Property>, DbError> {
        properties::add_property(&self.pool, property).await
    }
}
