//! Connection configuration for the store.
//!
//! Values come from the environment (`DB_*` variables) or from a JSON
//! config object. Anything left unset falls back to the local development
//! database (`vagrant@localhost/lightbnb`).

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::DbError;

const DEFAULT_USER: &str = "vagrant";
const DEFAULT_PASSWORD: &str = "123";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_DATABASE: &str = "lightbnb";
const DEFAULT_POOL_SIZE: u32 = 10;

/// How property listings are joined against `property_reviews`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ReviewJoin {
    /// Plain `JOIN`: properties without a single review are left out.
    #[default]
    Inner,
    /// `LEFT JOIN`: unreviewed properties appear with a null average.
    LeftOuter,
}

impl ReviewJoin {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "JOIN",
            Self::LeftOuter => "LEFT JOIN",
        }
    }
}

impl FromStr for ReviewJoin {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(Self::Inner),
            "left" | "outer" | "left_outer" => Ok(Self::LeftOuter),
            other => Err(DbError::Config(format!("unknown review join: {other}"))),
        }
    }
}

impl TryFrom<String> for ReviewJoin {
    type Error = DbError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Everything needed to open the shared pool.
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub pool_size: u32,
    /// Optional `search_path` applied to every pooled session.
    pub schema: Option<String>,
    pub review_join: ReviewJoin,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            schema: None,
            review_join: ReviewJoin::Inner,
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("pool_size", &self.pool_size)
            .field("schema", &self.schema)
            .field("review_join", &self.review_join)
            .finish()
    }
}

impl DbConfig {
    /// Load configuration from `DB_*` environment variables.
    pub fn from_env() -> Result<Self, DbError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, using the same keys as
    /// [`DbConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            user: lookup("DB_USER").unwrap_or(defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
            host: lookup("DB_HOST").unwrap_or(defaults.host),
            port: parse_or("DB_PORT", lookup("DB_PORT"), defaults.port)?,
            database: lookup("DB_NAME").unwrap_or(defaults.database),
            pool_size: parse_or("DB_POOL_SIZE", lookup("DB_POOL_SIZE"), defaults.pool_size)?,
            schema: lookup("DB_SCHEMA").filter(|s| !s.trim().is_empty()),
            review_join: match lookup("DB_REVIEW_JOIN") {
                Some(raw) => raw.parse()?,
                None => defaults.review_join,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config object such as
    /// `{"user": "...", "host": "...", "poolSize": 5}`.
    pub fn from_json(raw: &str) -> Result<Self, DbError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| DbError::Config(format!("malformed config object: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DbError> {
        if self.pool_size == 0 {
            return Err(DbError::Config("poolSize must be at least 1".into()));
        }
        Ok(())
    }

    /// Driver connect options. TLS is never requested.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database);

        match &self.schema {
            Some(schema) => options.options([("search_path", schema.as_str())]),
            None => options,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, DbError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| DbError::Config(format!("invalid {key}: {value:?}"))),
        None => Ok(default),
    }
}
