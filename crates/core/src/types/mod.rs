//! Core types for Loja.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod national_id;
pub mod price;
pub mod quantity;

pub use email::{Email, EmailError};
pub use id::*;
pub use national_id::{NationalId, NationalIdError};
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
