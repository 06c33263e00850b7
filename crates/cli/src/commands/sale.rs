//! Record a sale from the command line.
//!
//! # Usage
//!
//! ```bash
//! loja-cli sale --customer 1 --product 2 --quantity 3
//! ```
//!
//! Exits non-zero when the sale is refused for lack of stock.

use sqlx::SqlitePool;

use loja_admin::db::{SaleOutcome, SaleRepository};
use loja_admin::models::{NewSale, Sale};
use loja_core::{CustomerId, ProductId, Quantity};

use super::{CliError, connect};

/// Run the sales transaction for one customer, product and quantity.
///
/// # Errors
///
/// Returns `CliError::InsufficientStock` when the product has fewer units than
/// requested (nothing is written), and `CliError` if the quantity is not
/// positive, the customer or product does not exist, or the database fails.
pub async fn run(customer: i64, product: i64, quantity: i64) -> Result<(), CliError> {
    let quantity =
        Quantity::new(quantity).map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let sale = NewSale {
        customer_id: CustomerId::new(customer),
        product_id: ProductId::new(product),
        quantity,
    };

    let pool = connect().await?;
    let recorded = record(&pool, &sale).await;
    pool.close().await;

    let sale = recorded?;
    tracing::info!(
        sale_id = %sale.id,
        customer_id = %sale.customer_id,
        product_id = %sale.product_id,
        quantity = %sale.quantity,
        "Sale recorded"
    );
    Ok(())
}

/// Record `sale`, turning a stock refusal into an error.
async fn record(pool: &SqlitePool, sale: &NewSale) -> Result<Sale, CliError> {
    match SaleRepository::new(pool).record_sale(sale).await? {
        SaleOutcome::Recorded(sale) => Ok(sale),
        SaleOutcome::InsufficientStock {
            available,
            requested,
        } => Err(CliError::InsufficientStock {
            available,
            requested,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use loja_admin::db::{self, CustomerRepository, ProductRepository};
    use loja_admin::models::{NewCustomer, ProductInput};
    use loja_core::{Email, NationalId, Price};
    use secrecy::SecretString;

    use super::*;

    async fn file_pool(name: &str) -> (SqlitePool, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!("loja-cli-{}-{name}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let url = SecretString::from(format!("sqlite://{}", path.display()));
        let pool = db::create_pool(&url).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        (pool, path)
    }

    async fn seed(pool: &SqlitePool, stock: i64) -> NewSale {
        let customer = CustomerRepository::new(pool)
            .create(&NewCustomer {
                name: "Maria Souza".to_owned(),
                age: 28,
                national_id: NationalId::parse("153.509.460-56").unwrap(),
                email: Email::parse("maria@loja.com.br").unwrap(),
                address: "Av. Brasil, 455".to_owned(),
            })
            .await
            .unwrap();
        let product = ProductRepository::new(pool)
            .create(
                &ProductInput {
                    name: "Caderno".to_owned(),
                    price: Price::parse("18.50").unwrap(),
                    description: String::new(),
                    stock_quantity: stock,
                },
                "",
            )
            .await
            .unwrap();
        NewSale {
            customer_id: customer.id,
            product_id: product.id,
            quantity: Quantity::new(5).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_an_error() {
        let (pool, path) = file_pool("short").await;
        let sale = seed(&pool, 3).await;

        let err = record(&pool, &sale).await.unwrap_err();
        assert!(matches!(
            err,
            CliError::InsufficientStock {
                available: 3,
                requested: 5
            }
        ));
        assert_eq!(err.to_string(), "Insufficient stock: 3 available, 5 requested");

        pool.close().await;
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_sale_with_enough_stock_is_recorded() {
        let (pool, path) = file_pool("enough").await;
        let sale = seed(&pool, 8).await;

        let recorded = record(&pool, &sale).await.unwrap();
        assert_eq!(recorded.quantity.get(), 5);

        pool.close().await;
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected_before_connecting() {
        let err = run(1, 1, 0).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
