//! Reservation history.

use sqlx::PgPool;
use tracing::instrument;

use crate::{
    DbError,
    config::ReviewJoin,
    models::ReservationListing,
};

/// List a guest's completed stays, oldest first.
///
/// Only reservations whose `end_date` is strictly before today are
/// returned, each with its property and that property's average rating.
#[instrument(skip(pool), err)]
pub async fn get_all_reservations(
    pool: &PgPool,
    guest_id: i32,
    limit: u32,
    join: ReviewJoin,
) -> Result<Vec<ReservationListing>, DbError> {
    let sql = format!(
        r#"
        SELECT reservations.id AS reservation_id,
               reservations.guest_id,
               reservations.start_date,
               reservations.end_date,
               properties.*,
               AVG(property_reviews.rating)::float8 AS average_rating
        FROM reservations
        JOIN properties ON properties.id = reservations.property_id
        {} property_reviews ON properties.id = property_reviews.property_id
        WHERE reservations.guest_id = $1
        AND reservations.end_date < now()::date
        GROUP BY reservations.id, properties.id
        ORDER BY reservations.start_date
        LIMIT $2
        "#,
        join.as_sql()
    );

    let rows = sqlx::query_as::<_, ReservationListing>(&sql)
        .bind(guest_id)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
