//! Loja Core - Shared domain types.
//!
//! This crate provides the value types used across the Loja components:
//! - `admin` - The web administration panel (customers, products, sales)
//! - `cli` - Command-line tools for migrations, seeding and sales
//!
//! # Architecture
//!
//! The core crate contains only types and parsing rules - no I/O, no database
//! access, no HTTP. Database encode/decode support is opt-in through the
//! `sqlite` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, national ids,
//!   prices and quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
