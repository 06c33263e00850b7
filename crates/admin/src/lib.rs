//! Loja Admin library.
//!
//! Web administration for a small store: customers, products, and sales
//! recorded against stock. Server-rendered with Askama over a `SQLite`
//! database.
//!
//! The binary in `main.rs` loads [`config::AdminConfig`], opens the pool,
//! applies migrations and serves [`app::build`]. Integration tests and the
//! CLI reuse the same modules.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod uploads;
