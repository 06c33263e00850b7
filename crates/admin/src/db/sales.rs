//! Sale repository and the sales transaction.
//!
//! Recording a sale checks stock, decrements it and inserts the sale row in
//! one transaction. The stock decrement is a guarded `UPDATE` so two
//! concurrent sales can never drive `stock_quantity` below zero: whichever
//! commits second sees the reduced stock and is refused.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use loja_core::{CustomerId, ProductId, Quantity, SaleId};

use super::RepositoryError;
use crate::models::{NewSale, Sale, SaleWithNames};

/// Result of attempting to record a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleOutcome {
    /// Stock was decremented and the sale stored.
    Recorded(Sale),
    /// The product has fewer units than requested; nothing was changed.
    InsufficientStock {
        /// Units on hand when the sale was attempted.
        available: i64,
        /// Units requested.
        requested: i64,
    },
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: SaleId,
    customer_id: CustomerId,
    product_id: ProductId,
    quantity: i64,
    sold_at: DateTime<Utc>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = RepositoryError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(row.quantity).map_err(|e| {
            RepositoryError::DataCorruption(format!("sale {}: {e}", row.id))
        })?;
        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            product_id: row.product_id,
            quantity,
            sold_at: row.sold_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SaleWithNamesRow {
    #[sqlx(flatten)]
    sale: SaleRow,
    customer_name: String,
    product_name: String,
}

impl TryFrom<SaleWithNamesRow> for SaleWithNames {
    type Error = RepositoryError;

    fn try_from(row: SaleWithNamesRow) -> Result<Self, Self::Error> {
        Ok(Self {
            sale: row.sale.try_into()?,
            customer_name: row.customer_name,
            product_name: row.product_name,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
pub struct SaleRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SaleRepository<'a> {
    /// Create a new sale repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every sale with its customer and product names, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a stored quantity is not positive.
    pub async fn list_with_names(&self) -> Result<Vec<SaleWithNames>, RepositoryError> {
        let rows = sqlx::query_as::<_, SaleWithNamesRow>(
            r"
            SELECT s.id, s.customer_id, s.product_id, s.quantity, s.sold_at,
                   c.name AS customer_name,
                   p.name AS product_name
            FROM sale s
            JOIN customer c ON c.id = s.customer_id
            JOIN product p ON p.id = s.product_id
            ORDER BY s.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(SaleWithNames::try_from).collect()
    }

    /// Get a sale by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: SaleId) -> Result<Option<Sale>, RepositoryError> {
        let row = sqlx::query_as::<_, SaleRow>(
            r"
            SELECT id, customer_id, product_id, quantity, sold_at
            FROM sale
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Sale::try_from).transpose()
    }

    /// Count sales.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Record a sale: decrement stock and insert the sale atomically.
    ///
    /// Insufficient stock is an expected outcome, not an error; the
    /// transaction is rolled back and [`SaleOutcome::InsufficientStock`]
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product or customer does not
    /// exist. Returns `RepositoryError::Database` if any statement fails; no
    /// partial effect is left behind in either case.
    #[instrument(
        skip(self, sale),
        fields(
            customer_id = %sale.customer_id,
            product_id = %sale.product_id,
            quantity = %sale.quantity,
        )
    )]
    pub async fn record_sale(&self, sale: &NewSale) -> Result<SaleOutcome, RepositoryError> {
        let requested = sale.quantity.get();
        let mut tx = self.pool.begin().await?;

        // Write first so the transaction holds the write lock from its first
        // statement on.
        let decremented = sqlx::query(
            r"
            UPDATE product
            SET stock_quantity = stock_quantity - ?1
            WHERE id = ?2 AND stock_quantity >= ?1
            ",
        )
        .bind(requested)
        .bind(sale.product_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if decremented == 0 {
            let available: Option<i64> =
                sqlx::query_scalar("SELECT stock_quantity FROM product WHERE id = ?")
                    .bind(sale.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;

            let Some(available) = available else {
                return Err(RepositoryError::NotFound("product"));
            };
            tracing::warn!(available, requested, "Insufficient stock for sale");
            return Ok(SaleOutcome::InsufficientStock {
                available,
                requested,
            });
        }

        let customer_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customer WHERE id = ?)")
                .bind(sale.customer_id)
                .fetch_one(&mut *tx)
                .await?;
        if !customer_exists {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound("customer"));
        }

        let row = sqlx::query_as::<_, SaleRow>(
            r"
            INSERT INTO sale (customer_id, product_id, quantity, sold_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, customer_id, product_id, quantity, sold_at
            ",
        )
        .bind(sale.customer_id)
        .bind(sale.product_id)
        .bind(requested)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let recorded = Sale::try_from(row)?;
        tracing::info!(sale_id = %recorded.id, "Sale recorded");
        Ok(SaleOutcome::Recorded(recorded))
    }
}
