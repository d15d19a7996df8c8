//! Property search and creation.

use sqlx::{PgPool, Postgres};
use tracing::{debug, instrument};

use crate::{
    DbError,
    config::ReviewJoin,
    models::{NewProperty, Property, PropertyListing, PropertyQuery},
    query::{BindValue, ListingSql},
};

/// List properties matching `query`, cheapest first, at most `limit` rows.
#[instrument(skip(pool), err)]
pub async fn get_all_properties(
    pool: &PgPool,
    query: &PropertyQuery,
    limit: u32,
    join: ReviewJoin,
) -> Result<Vec<PropertyListing>, DbError> {
    let ListingSql { sql, binds } = ListingSql::build(query, limit, join);
    debug!(%sql, binds = binds.len(), "property listing query");

    let mut statement = sqlx::query_as::<Postgres, PropertyListing>(&sql);
    for value in binds {
        statement = match value {
            BindValue::Text(text) => statement.bind(text),
            BindValue::Int(int) => statement.bind(int),
            BindValue::Float(float) => statement.bind(float),
        };
    }

    let rows = statement.fetch_all(pool).await?;
    Ok(rows)
}

/// Insert a property and return every row the insert produced.
#[instrument(skip(pool, property), fields(owner_id = property.owner_id, city = %property.city), err)]
pub async fn add_property(pool: &PgPool, property: &NewProperty) -> Result<Vec<Property>, DbError> {
    let rows = sqlx::query_as::<_, Property>(
        r#"
        INSERT INTO properties (
            owner_id, title, description, thumbnail_photo_url, cover_photo_url,
            cost_per_night, street, city, province, post_code, country,
            parking_spaces, number_of_bathrooms, number_of_bedrooms)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(property.owner_id)
    .bind(&property.title)
    .bind(&property.description)
    .bind(&property.thumbnail_photo_url)
    .bind(&property.cover_photo_url)
    .bind(property.cost_per_night)
    .bind(&property.street)
    .bind(&property.city)
    .bind(&property.province)
    .bind(&property.post_code)
    .bind(&property.country)
    .bind(property.parking_spaces)
    .bind(property.number_of_bathrooms)
    .bind(property.number_of_bedrooms)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
