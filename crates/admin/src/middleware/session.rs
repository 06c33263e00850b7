//! Session configuration for admin.
//!
//! Sessions only carry flash messages. They live in the `tower_sessions`
//! table of the application database, and the session id cookie is signed
//! with a key derived from `LOJA_SESSION_SECRET`.

use axum::Router;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use sqlx::SqlitePool;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "loja_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session store and make sure its table exists.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table cannot be created.
pub async fn create_session_store(pool: &SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;
    Ok(store)
}

/// Derive the 64-byte cookie signing key from the configured secret.
fn signing_key(config: &AdminConfig) -> Key {
    let digest = Sha512::digest(config.session_secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}

/// Wrap `router` in the signed-cookie session layer.
pub fn with_session_layer<S>(
    router: Router<S>,
    store: SqliteStore,
    config: &AdminConfig,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let layer = SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config));

    router.layer(layer)
}
