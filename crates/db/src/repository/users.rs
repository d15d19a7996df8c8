//! User lookups and registration.

use sqlx::PgPool;
use tracing::instrument;

use crate::{
    DbError,
    models::{NewUser, User},
};

/// Fetch a user by email, ignoring case. The address is compared
/// literally; `%` and `_` are not wildcards.
#[instrument(skip(pool), err)]
pub async fn get_user_with_email(pool: &PgPool, email: &str) -> Result<Option<User>, DbError> {
    let row = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password
        FROM users
        WHERE lower(email) = lower($1)
        LIMIT 1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Fetch a user by primary key.
#[instrument(skip(pool), err)]
pub async fn get_user_with_id(pool: &PgPool, id: i32) -> Result<Option<User>, DbError> {
    let row = sqlx::query_as::<_, User>(
        r#"SELECT id, name, email, password FROM users WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Insert a new user exactly as given.
///
/// No hashing and no duplicate check: a repeated email is rejected (or not)
/// by the store's own constraints.
#[instrument(skip(pool, user), fields(email = %user.email), err)]
pub async fn add_user(pool: &PgPool, user: &NewUser) -> Result<User, DbError> {
    let row = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, password
        "#,
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
