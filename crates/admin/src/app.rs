//! Router assembly: routes, static files and the middleware stack.

use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    create_session_store, request_id_middleware, security_headers_middleware, with_session_layer,
};
use crate::routes;
use crate::state::AppState;

/// Build the full application with every layer applied.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table cannot be created.
pub async fn build(state: AppState) -> Result<Router, sqlx::Error> {
    let config = state.config();
    let session_store = create_session_store(state.pool()).await?;

    let router = routes::routes()
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .fallback(routes::not_found);

    let router = with_session_layer(router, session_store, config)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                        request_id = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state.clone())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    Ok(router)
}
