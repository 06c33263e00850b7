//! Sale domain models.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use loja_core::{CustomerId, ProductId, Quantity, SaleId};

/// An immutable sale: one customer bought `quantity` units of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// When the sale was committed.
    pub sold_at: DateTime<Utc>,
}

impl Sale {
    /// Sale time in local time, as `dd/mm/yyyy hh:mm`.
    #[must_use]
    pub fn sold_at_display(&self) -> String {
        self.sold_at
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M")
            .to_string()
    }
}

/// A sale joined with the names of its customer and product, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleWithNames {
    pub sale: Sale,
    pub customer_name: String,
    pub product_name: String,
}

/// Validated input for the sales transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: Quantity,
}
