//! Customer domain models.

use serde::{Deserialize, Serialize};

use loja_core::{CustomerId, Email, NationalId};

/// A customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    /// System-assigned id.
    pub id: CustomerId,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: i64,
    /// National id (CPF), unique across customers.
    pub national_id: NationalId,
    /// Contact email.
    pub email: Email,
    /// Postal address.
    pub address: String,
}

/// Validated input for creating or updating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub age: i64,
    pub national_id: NationalId,
    pub email: Email,
    pub address: String,
}
