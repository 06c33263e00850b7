//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    db::{CustomerRepository, ProductRepository, SaleRepository},
    error::AppError,
    filters,
    middleware::Flash,
    state::AppState,
};

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub current_path: &'static str,
    pub flashes: Vec<Flash>,
    pub customer_count: i64,
    pub product_count: i64,
    pub sale_count: i64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Dashboard page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<HomeTemplate, AppError> {
    let pool = state.pool();

    Ok(HomeTemplate {
        current_path: "/",
        flashes: Flash::take_all(&session).await?,
        customer_count: CustomerRepository::new(pool).count().await?,
        product_count: ProductRepository::new(pool).count().await?,
        sale_count: SaleRepository::new(pool).count().await?,
    })
}
