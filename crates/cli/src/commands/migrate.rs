//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! loja-cli migrate
//! ```
//!
//! Migrations are embedded from `crates/admin/migrations/`; the admin server
//! also applies them at startup.

use super::{CliError, database_url};
use loja_admin::db;

/// Apply all pending migrations to the configured database.
///
/// # Errors
///
/// Returns `CliError` if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), CliError> {
    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url()).await?;

    tracing::info!("Running migrations...");
    db::run_migrations(&pool).await?;

    pool.close().await;
    tracing::info!("Migrations complete!");
    Ok(())
}
