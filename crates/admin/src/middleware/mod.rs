//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, one transaction per request)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (record in span, echo in `x-request-id`)
//! 4. Security headers (strict CSP)
//! 5. Session layer (signed cookie, `SQLite` store, carries flash messages)

pub mod flash;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use flash::{Flash, FlashLevel};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_store, with_session_layer};
