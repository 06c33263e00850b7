//! Product domain models.

use serde::{Deserialize, Serialize};

use loja_core::{Price, ProductId};

/// A product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// System-assigned id.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Free-text description.
    pub description: String,
    /// Units available for sale. Never negative.
    pub stock_quantity: i64,
    /// File name of the product image inside the upload directory.
    pub image: String,
}

impl Product {
    /// Whether at least `quantity` units can be sold.
    #[must_use]
    pub const fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

/// Validated product fields, excluding the image which is stored separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: Price,
    pub description: String,
    pub stock_quantity: i64,
}
