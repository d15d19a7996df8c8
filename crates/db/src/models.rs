//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models: no validation, no hashing, no currency
//! formatting. Money is always integral cents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// A persisted user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Opaque password hash, stored as supplied.
    pub password: String,
}

/// Input for [`crate::repository::users::add_user`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// properties
// ---------------------------------------------------------------------------

/// A persisted property row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly cost in cents.
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

/// The fourteen columns written by [`crate::repository::properties::add_property`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly cost in cents.
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

/// A property together with the mean of its review ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PropertyListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    /// `None` only for unreviewed properties under a left join.
    pub average_rating: Option<f64>,
}

/// Optional filters for [`crate::repository::properties::get_all_properties`].
///
/// Prices are in major currency units (dollars); they are converted to
/// cents before being compared against `cost_per_night`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyQuery {
    pub city: Option<String>,
    pub owner_id: Option<i32>,
    pub minimum_price_per_night: Option<f64>,
    pub maximum_price_per_night: Option<f64>,
    pub minimum_rating: Option<f64>,
}

// ---------------------------------------------------------------------------
// reservations
// ---------------------------------------------------------------------------

/// A past reservation joined with the reserved property and its rating.
///
/// The reservation's own id is exposed as `reservation_id`; `property.id`
/// is the property's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReservationListing {
    pub reservation_id: i32,
    pub guest_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}

/// Convert major currency units to cents, rounding to the nearest cent.
pub fn to_cents(major: f64) -> i64 {
    (major * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_property() -> Property {
        Property {
            id: 7,
            owner_id: 2,
            title: "Speed lamp".into(),
            description: None,
            thumbnail_photo_url: "https://img.example/t.jpg".into(),
            cover_photo_url: "https://img.example/c.jpg".into(),
            cost_per_night: 93061,
            parking_spaces: 6,
            number_of_bathrooms: 4,
            number_of_bedrooms: 8,
            country: "Canada".into(),
            street: "536 Namsub Highway".into(),
            city: "Sotboske".into(),
            province: "Quebec".into(),
            post_code: "28142".into(),
            active: true,
        }
    }

    #[test]
    fn to_cents_scales_and_rounds() {
        assert_eq!(to_cents(100.0), 10_000);
        assert_eq!(to_cents(0.0), 0);
        assert_eq!(to_cents(19.99), 1_999);
        assert_eq!(to_cents(250.5), 25_050);
    }

    #[test]
    fn property_listing_serializes_flat() {
        let listing = PropertyListing {
            property: sample_property(),
            average_rating: Some(4.5),
        };
        let value = serde_json::to_value(&listing).unwrap();

        assert_eq!(value["id"], json!(7));
        assert_eq!(value["cost_per_night"], json!(93061));
        assert_eq!(value["average_rating"], json!(4.5));
        assert!(value.get("property").is_none());
    }

    #[test]
    fn reservation_listing_keeps_both_ids() {
        let listing = ReservationListing {
            reservation_id: 41,
            guest_id: 3,
            start_date: NaiveDate::from_ymd_opt(2018, 9, 11).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2018, 9, 26).unwrap(),
            property: sample_property(),
            average_rating: Some(3.0),
        };
        let value = serde_json::to_value(&listing).unwrap();

        assert_eq!(value["reservation_id"], json!(41));
        assert_eq!(value["id"], json!(7));
        assert_eq!(value["start_date"], json!("2018-09-11"));
    }

    #[test]
    fn property_query_accepts_partial_json() {
        let query: PropertyQuery =
            serde_json::from_value(json!({ "city": "Vancouver", "minimum_rating": 4 })).unwrap();
        assert_eq!(query.city.as_deref(), Some("Vancouver"));
        assert_eq!(query.minimum_rating, Some(4.0));
        assert!(query.maximum_price_per_night.is_none());
    }
}
