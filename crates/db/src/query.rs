//! Dynamic SQL for the property listing.
//!
//! Filters are collected as an ordered list of [`Predicate`]s, one per
//! recognised key, in a fixed declaration order. The `$n` placeholder of
//! each predicate is its position in that list, so the bind list and the
//! rendered SQL can never drift apart.

use crate::config::ReviewJoin;
use crate::models::{to_cents, PropertyQuery};

/// A value bound to one `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Float(f64),
}

/// Which clause a predicate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    /// Filters rows before grouping.
    Where,
    /// Filters groups after the rating aggregate is computed.
    Having,
}

/// One filter: `<expr> $n`, with `n` assigned at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub clause: Clause,
    pub expr: &'static str,
    pub value: BindValue,
}

impl Predicate {
    fn new(clause: Clause, expr: &'static str, value: BindValue) -> Self {
        Self { clause, expr, value }
    }
}

impl PropertyQuery {
    /// Predicates for every filter that is set, in declaration order.
    ///
    /// An empty city and zero or non-finite numbers count as unset. The city
    /// is matched verbatim. All `WHERE` predicates precede all `HAVING`
    /// predicates.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(city) = self.city.as_deref().filter(|c| !c.is_empty()) {
            predicates.push(Predicate::new(
                Clause::Where,
                "properties.city ILIKE",
                BindValue::Text(format!("%{city}%")),
            ));
        }

        if let Some(owner_id) = self.owner_id.filter(|id| *id != 0) {
            predicates.push(Predicate::new(
                Clause::Where,
                "properties.owner_id =",
                BindValue::Int(i64::from(owner_id)),
            ));
        }

        if let Some(min) = self.minimum_price_per_night.filter(is_set) {
            predicates.push(Predicate::new(
                Clause::Where,
                "properties.cost_per_night >=",
                BindValue::Int(to_cents(min)),
            ));
        }

        if let Some(max) = self.maximum_price_per_night.filter(is_set) {
            predicates.push(Predicate::new(
                Clause::Where,
                "properties.cost_per_night <=",
                BindValue::Int(to_cents(max)),
            ));
        }

        if let Some(rating) = self.minimum_rating.filter(is_set) {
            predicates.push(Predicate::new(
                Clause::Having,
                "AVG(property_reviews.rating) >=",
                BindValue::Float(rating),
            ));
        }

        predicates
    }
}

fn is_set(value: &f64) -> bool {
    value.is_finite() && *value != 0.0
}

/// A rendered listing statement and its binds, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSql {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl ListingSql {
    pub fn build(query: &PropertyQuery, limit: u32, join: ReviewJoin) -> Self {
        let predicates = query.predicates();

        let mut sql = format!(
            "SELECT properties.*, AVG(property_reviews.rating)::float8 AS average_rating \
             FROM properties \
             {} property_reviews ON properties.id = property_reviews.property_id",
            join.as_sql()
        );

        let mut binds = Vec::with_capacity(predicates.len() + 1);
        let mut where_parts = Vec::new();
        let mut having_parts = Vec::new();

        for predicate in predicates {
            binds.push(predicate.value);
            let rendered = format!("{} ${}", predicate.expr, binds.len());
            match predicate.clause {
                Clause::Where => where_parts.push(rendered),
                Clause::Having => having_parts.push(rendered),
            }
        }

        if !where_parts.is_empty() {
            sql.push_str(&format!(" WHERE {}", where_parts.join(" AND ")));
        }

        sql.push_str(" GROUP BY properties.id");

        if !having_parts.is_empty() {
            sql.push_str(&format!(" HAVING {}", having_parts.join(" AND ")));
        }

        binds.push(BindValue::Int(i64::from(limit)));
        sql.push_str(&format!(" ORDER BY properties.cost_per_night LIMIT ${}", binds.len()));

        Self { sql, binds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT properties.*, AVG(property_reviews.rating)::float8 AS average_rating \
                        FROM properties \
                        JOIN property_reviews ON properties.id = property_reviews.property_id";

    #[test]
    fn no_filters_only_groups_orders_and_limits() {
        let built = ListingSql::build(&PropertyQuery::default(), 10, ReviewJoin::Inner);

        assert_eq!(
            built.sql,
            format!("{BASE} GROUP BY properties.id ORDER BY properties.cost_per_night LIMIT $1")
        );
        assert_eq!(built.binds, vec![BindValue::Int(10)]);
    }

    #[test]
    fn first_filter_uses_where_and_later_ones_use_and() {
        let query = PropertyQuery {
            city: Some("Vancouver".into()),
            minimum_price_per_night: Some(100.0),
            maximum_price_per_night: Some(200.0),
            ..Default::default()
        };
        let built = ListingSql::build(&query, 10, ReviewJoin::Inner);

        assert!(built.sql.contains(
            " WHERE properties.city ILIKE $1 \
             AND properties.cost_per_night >= $2 \
             AND properties.cost_per_night <= $3 GROUP BY"
        ));
        assert!(built.sql.ends_with("LIMIT $4"));
        assert_eq!(
            built.binds,
            vec![
                BindValue::Text("%Vancouver%".into()),
                BindValue::Int(10_000),
                BindValue::Int(20_000),
                BindValue::Int(10),
            ]
        );
    }

    #[test]
    fn minimum_rating_is_a_having_filter() {
        let query = PropertyQuery {
            minimum_rating: Some(4.0),
            ..Default::default()
        };
        let built = ListingSql::build(&query, 5, ReviewJoin::Inner);

        assert!(!built.sql.contains("WHERE"));
        assert!(built
            .sql
            .contains("GROUP BY properties.id HAVING AVG(property_reviews.rating) >= $1 ORDER BY"));
        assert_eq!(built.binds, vec![BindValue::Float(4.0), BindValue::Int(5)]);
    }

    #[test]
    fn placeholders_follow_bind_positions_when_filters_are_sparse() {
        let query = PropertyQuery {
            maximum_price_per_night: Some(150.0),
            minimum_rating: Some(3.5),
            ..Default::default()
        };
        let built = ListingSql::build(&query, 20, ReviewJoin::Inner);

        assert!(built.sql.contains("WHERE properties.cost_per_night <= $1 GROUP BY"));
        assert!(built.sql.contains("HAVING AVG(property_reviews.rating) >= $2"));
        assert!(built.sql.ends_with("LIMIT $3"));
        assert_eq!(
            built.binds,
            vec![BindValue::Int(15_000), BindValue::Float(3.5), BindValue::Int(20)]
        );
    }

    #[test]
    fn every_placeholder_has_exactly_one_bind() {
        let query = PropertyQuery {
            city: Some("van".into()),
            owner_id: Some(3),
            minimum_price_per_night: Some(50.0),
            maximum_price_per_night: Some(500.0),
            minimum_rating: Some(2.0),
        };
        let built = ListingSql::build(&query, 10, ReviewJoin::Inner);

        assert_eq!(built.binds.len(), 6);
        for n in 1..=built.binds.len() {
            assert_eq!(built.sql.matches(&format!("${n}")).count(), 1, "placeholder ${n}");
        }
        assert!(!built.sql.contains("$7"));
    }

    #[test]
    fn owner_filter_sits_between_city_and_price() {
        let query = PropertyQuery {
            city: Some("Calgary".into()),
            owner_id: Some(12),
            minimum_price_per_night: Some(80.0),
            ..Default::default()
        };
        let built = ListingSql::build(&query, 10, ReviewJoin::Inner);

        assert!(built.sql.contains(
            "WHERE properties.city ILIKE $1 AND properties.owner_id = $2 \
             AND properties.cost_per_night >= $3"
        ));
        assert_eq!(built.binds[1], BindValue::Int(12));
    }

    #[test]
    fn empty_and_zero_filters_are_ignored() {
        let query = PropertyQuery {
            city: Some(String::new()),
            owner_id: Some(0),
            minimum_price_per_night: Some(0.0),
            maximum_price_per_night: None,
            minimum_rating: Some(0.0),
        };
        assert!(query.predicates().is_empty());

        let built = ListingSql::build(&query, 10, ReviewJoin::Inner);
        assert!(!built.sql.contains("WHERE"));
        assert!(!built.sql.contains("HAVING"));
    }

    #[test]
    fn non_finite_numbers_are_ignored() {
        let query = PropertyQuery {
            minimum_price_per_night: Some(f64::NEG_INFINITY),
            maximum_price_per_night: Some(f64::NAN),
            minimum_rating: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(query.predicates().is_empty());

        let built = ListingSql::build(&query, 10, ReviewJoin::Inner);
        assert_eq!(built.binds, vec![BindValue::Int(10)]);
    }

    #[test]
    fn city_is_matched_verbatim() {
        let query = PropertyQuery {
            city: Some("New ".into()),
            ..Default::default()
        };
        assert_eq!(query.predicates()[0].value, BindValue::Text("%New %".into()));

        let spaces = PropertyQuery {
            city: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(spaces.predicates()[0].value, BindValue::Text("%  %".into()));
    }

    #[test]
    fn left_outer_join_is_opt_in() {
        let inner = ListingSql::build(&PropertyQuery::default(), 10, ReviewJoin::default());
        assert!(inner.sql.contains("FROM properties JOIN property_reviews"));

        let outer = ListingSql::build(&PropertyQuery::default(), 10, ReviewJoin::LeftOuter);
        assert!(outer.sql.contains("FROM properties LEFT JOIN property_reviews"));
    }

    #[test]
    fn results_are_ordered_by_nightly_cost() {
        let built = ListingSql::build(&PropertyQuery::default(), 10, ReviewJoin::Inner);
        assert!(built.sql.contains("ORDER BY properties.cost_per_night LIMIT"));
    }
}
