//! Product repository.

use sqlx::SqlitePool;
use tracing::instrument;

use loja_core::ProductId;

use super::RepositoryError;
use crate::models::{Product, ProductInput};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every product ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, price, description, stock_quantity, image
            FROM product
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, price, description, stock_quantity, image
            FROM product
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Count products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a product with its stored image file name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: &ProductInput,
        image: &str,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO product (name, price, description, stock_quantity, image)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, price, description, stock_quantity, image
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(input.stock_quantity)
        .bind(image)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Update a product's fields. The image is replaced only when `image` is `Some`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
        image: Option<&str>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE product
            SET name = ?, price = ?, description = ?, stock_quantity = ?,
                image = COALESCE(?, image)
            WHERE id = ?
            RETURNING id, name, price, description, stock_quantity, image
            ",
        )
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(input.stock_quantity)
        .bind(image)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound("product"))?;

        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Delete a product that has no sales.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    /// Returns `RepositoryError::Conflict` if sales reference the product.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r"
            DELETE FROM product
            WHERE id = ?
              AND NOT EXISTS (SELECT 1 FROM sale WHERE sale.product_id = product.id)
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_constraint(e, "product has sales"))?
        .rows_affected();

        if deleted == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM product WHERE id = ?)")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Err(if exists {
                RepositoryError::Conflict("product has sales".to_owned())
            } else {
                RepositoryError::NotFound("product")
            });
        }

        tx.commit().await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use loja_core::Price;

    use super::*;
    use crate::db::test_pool;

    fn caneca() -> ProductInput {
        ProductInput {
            name: "Caneca de cerâmica".to_owned(),
            price: Price::parse("39,90").unwrap(),
            description: "Caneca 350 ml".to_owned(),
            stock_quantity: 12,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_keeps_price_precision() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&caneca(), "caneca.png").await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.price.to_string(), "39.90");
        assert_eq!(fetched.image, "caneca.png");
        assert_eq!(fetched.stock_quantity, 12);
    }

    #[tokio::test]
    async fn test_update_without_image_keeps_existing_file() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let created = repo.create(&caneca(), "caneca.png").await.unwrap();

        let mut changed = caneca();
        changed.stock_quantity = 3;
        let updated = repo.update(created.id, &changed, None).await.unwrap();
        assert_eq!(updated.image, "caneca.png");
        assert_eq!(updated.stock_quantity, 3);

        let updated = repo
            .update(created.id, &changed, Some("caneca-azul.jpg"))
            .await
            .unwrap();
        assert_eq!(updated.image, "caneca-azul.jpg");
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let err = repo
            .update(ProductId::new(7), &caneca(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound("product")));
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);

        let mut input = caneca();
        input.stock_quantity = -1;
        let err = repo.create(&input, "caneca.png").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Database(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let pool = test_pool().await;
        let repo = ProductRepository::new(&pool);
        let created = repo.create(&caneca(), "caneca.png").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.delete(created.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
