//! Health and database check endpoints.

use axum::{Router, extract::State, http::StatusCode, routing::get};
use tracing::instrument;

use crate::{db::CustomerRepository, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/test_db", get(test_db))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Human-readable database check: reports the first customer's name, or the
/// error text when the query fails.
#[instrument(skip(state))]
async fn test_db(State(state): State<AppState>) -> String {
    match CustomerRepository::new(state.pool()).first().await {
        Ok(Some(customer)) => format!(
            "Banco de dados está funcionando! Primeiro cliente: {}",
            customer.name
        ),
        Ok(None) => {
            "Banco de dados está funcionando, mas não há clientes cadastrados.".to_string()
        }
        Err(e) => {
            tracing::error!(error = %e, "Database check failed");
            format!("Ocorreu um erro ao acessar o banco de dados: {e}")
        }
    }
}
