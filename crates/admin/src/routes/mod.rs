//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Dashboard with record counts
//!
//! # Customers
//! GET  /clientes                  - Customer listing
//! GET  /cliente/novo              - New customer form
//! POST /cliente/novo              - Create customer
//! GET  /cliente/editar/{id}       - Edit customer form
//! POST /cliente/editar/{id}       - Update customer
//! GET  /cliente/deletar/{id}      - Delete customer
//!
//! # Products
//! GET  /produtos                  - Product listing
//! GET  /produto/novo              - New product form
//! POST /produto/novo              - Create product (multipart, with image)
//! GET  /produto/editar/{id}       - Edit product form
//! POST /produto/editar/{id}       - Update product (image optional)
//! GET  /produto/deletar/{id}      - Delete product
//!
//! # Sales
//! GET  /vendas                    - Sale listing
//! GET  /venda/nova                - New sale form
//! POST /venda/nova                - Record sale
//!
//! # Reports
//! GET  /relatorios                - Sales per customer chart
//!
//! # Health
//! GET  /health                    - Liveness
//! GET  /health/ready              - Readiness (database reachable)
//! GET  /test_db                   - Database check with first customer name
//! ```

pub mod customers;
pub mod health;
pub mod home;
pub mod products;
pub mod reports;
pub mod sales;

use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

/// Build the complete application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(home::router())
        .merge(customers::router())
        .merge(products::router())
        .merge(sales::router())
        .merge(reports::router())
        .merge(health::router())
}

/// Fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Página não encontrada".to_string())
}
