//! `lightbnb` CLI entry-point.
//!
//! Runs one data-access operation against the LightBnB database and prints
//! the result as JSON.
//!
//! Available sub-commands:
//! - `user-by-email` — look a user up by email (case-insensitive).
//! - `user`          — look a user up by id.
//! - `add-user`      — register a user.
//! - `reservations`  — a guest's completed stays.
//! - `properties`    — filtered property listing.
//! - `add-property`  — insert a property from a JSON file.
//!
//! Connection settings come from `DB_*` variables (a `.env` file is read if
//! present) or from `--config <file.json>`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use db::{
    Database, DbConfig, ReviewJoin,
    models::{NewProperty, NewUser, PropertyQuery},
};

#[derive(Parser, Debug)]
#[command(
    name = "lightbnb",
    about = "Query and update the LightBnB rental database",
    version
)]
struct Cli {
    /// JSON config object (`user`, `password`, `host`, `database`, `poolSize`, ...).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Include properties that have no reviews yet.
    #[arg(long, global = true)]
    outer_join: bool,

    /// Verbose logging (ignored when RUST_LOG is set).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find a user by email.
    UserByEmail { email: String },
    /// Find a user by id.
    User { id: i32 },
    /// Register a new user. The password is stored as given.
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List a guest's completed reservations.
    Reservations {
        guest_id: i32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List properties, cheapest first.
    Properties {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        owner_id: Option<i32>,
        /// Dollars per night.
        #[arg(long)]
        min_price: Option<f64>,
        /// Dollars per night.
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        min_rating: Option<f64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Insert a property described by a JSON file (cost in cents).
    AddProperty { path: PathBuf },
}

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

fn load_config(path: Option<&Path>, outer_join: bool) -> Result<DbConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            DbConfig::from_json(&raw)?
        }
        None => DbConfig::from_env()?,
    };
    if outer_join {
        config.review_join = ReviewJoin::LeftOuter;
    }
    Ok(config)
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).context("failed to serialize result")
}

async fn run(db: &Database, command: Command) -> Result<serde_json::Value> {
    match command {
        Command::UserByEmail { email } => to_json(&db.get_user_with_email(&email).await?),
        Command::User { id } => to_json(&db.get_user_with_id(id).await?),
        Command::AddUser { name, email, password } => {
            let user = db.add_user(&NewUser { name, email, password }).await?;
            info!(id = user.id, "user added");
            to_json(&user)
        }
        Command::Reservations { guest_id, limit } => {
            to_json(&db.get_all_reservations(guest_id, limit).await?)
        }
        Command::Properties { city, owner_id, min_price, max_price, min_rating, limit } => {
            let query = PropertyQuery {
                city,
                owner_id,
                minimum_price_per_night: min_price,
                maximum_price_per_night: max_price,
                minimum_rating: min_rating,
            };
            to_json(&db.get_all_properties(&query, limit).await?)
        }
        Command::AddProperty { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let property: NewProperty =
                serde_json::from_str(&raw).with_context(|| format!("invalid property in {}", path.display()))?;
            let rows = db.add_property(&property).await?;
            info!(count = rows.len(), "property added");
            to_json(&rows)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = load_config(cli.config.as_deref(), cli.outer_join)?;
    debug!(?config, "resolved database config");

    let db = Database::connect(&config)
        .await
        .context("failed to connect to database")?;

    let outcome = run(&db, cli.command).await;
    db.close().await;

    println!("{}", serde_json::to_string_pretty(&outcome?)?);
    Ok(())
}
