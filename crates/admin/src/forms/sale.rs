//! New sale form.

use serde::Deserialize;

use loja_core::{CustomerId, ProductId, Quantity};

use super::{FieldErrors, required_integer};
use crate::models::NewSale;

/// Raw sale form submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SaleForm {
    #[serde(rename = "cliente_id")]
    pub customer_id: String,
    #[serde(rename = "produto_id")]
    pub product_id: String,
    #[serde(rename = "quantidade")]
    pub quantity: String,
}

impl SaleForm {
    /// Validate the selected references and the quantity.
    ///
    /// Existence of the customer and product is checked by the sales
    /// transaction, not here.
    ///
    /// # Errors
    ///
    /// Returns the field messages if any field is missing or invalid.
    pub fn validate(&self) -> Result<NewSale, FieldErrors> {
        let mut errors = FieldErrors::new();

        let customer_id = positive_id(&mut errors, "cliente_id", "Cliente", &self.customer_id);
        let product_id = positive_id(&mut errors, "produto_id", "Produto", &self.product_id);
        let quantity = required_integer(&mut errors, "quantidade", "Quantidade", &self.quantity)
            .and_then(|q| {
                Quantity::new(q)
                    .map_err(|_| errors.insert("quantidade", "Quantidade deve ser pelo menos 1."))
                    .ok()
            });

        match (customer_id, product_id, quantity) {
            (Some(customer_id), Some(product_id), Some(quantity)) if errors.is_empty() => {
                Ok(NewSale {
                    customer_id: CustomerId::new(customer_id),
                    product_id: ProductId::new(product_id),
                    quantity,
                })
            }
            _ => Err(errors),
        }
    }

    /// Whether `id` is the currently selected customer.
    #[must_use]
    pub fn is_customer_selected(&self, id: CustomerId) -> bool {
        self.customer_id.trim() == id.to_string()
    }

    /// Whether `id` is the currently selected product.
    #[must_use]
    pub fn is_product_selected(&self, id: ProductId) -> bool {
        self.product_id.trim() == id.to_string()
    }
}

fn positive_id(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    raw: &str,
) -> Option<i64> {
    if raw.trim().is_empty() {
        errors.insert(field, format!("Selecione um {}.", label.to_lowercase()));
        return None;
    }
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.insert(field, format!("{label} inválido."));
            None
        }
    }
}
