//! Domain models for the admin panel.

pub mod customer;
pub mod product;
pub mod sale;

pub use customer::{Customer, NewCustomer};
pub use product::{Product, ProductInput};
pub use sale::{NewSale, Sale, SaleWithNames};
