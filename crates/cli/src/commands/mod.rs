//! Subcommand implementations.
//!
//! # Environment Variables
//!
//! - `LOJA_DATABASE_URL` - `SQLite` connection string (falls back to
//!   `DATABASE_URL`, then `sqlite://loja.db`)

pub mod migrate;
pub mod sale;
pub mod seed;

use secrecy::SecretString;
use sqlx::SqlitePool;
use thiserror::Error;

use loja_admin::db::{self, RepositoryError};

const DEFAULT_DATABASE_URL: &str = "sqlite://loja.db";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The product has fewer units than requested; nothing was written.
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Units in stock.
        available: i64,
        /// Units asked for.
        requested: i64,
    },

    /// Command-line value rejected before touching the database.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Resolve the database URL from the environment.
fn database_url() -> SecretString {
    dotenvy::dotenv().ok();

    std::env::var("LOJA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned())
        .into()
}

/// Open the configured database and bring its schema up to date.
async fn connect() -> Result<SqlitePool, CliError> {
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url()).await?;
    db::run_migrations(&pool).await?;
    Ok(pool)
}
