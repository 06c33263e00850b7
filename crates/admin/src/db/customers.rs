//! Customer repository.

use sqlx::SqlitePool;
use tracing::instrument;

use loja_core::CustomerId;

use super::RepositoryError;
use crate::models::{Customer, NewCustomer};

const DUPLICATE_NATIONAL_ID: &str = "national id already registered";

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every customer ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as::<_, Customer>(
            r"
            SELECT id, name, age, national_id, email, address
            FROM customer
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            SELECT id, name, age, national_id, email, address
            FROM customer
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Get the customer with the lowest id, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first(&self) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            SELECT id, name, age, national_id, email, address
            FROM customer
            ORDER BY id
            LIMIT 1
            ",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Count customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customer")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a customer and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the national id is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, input), fields(national_id = %input.national_id))]
    pub async fn create(&self, input: &NewCustomer) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            INSERT INTO customer (name, age, national_id, email, address)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, age, national_id, email, address
            ",
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.national_id)
        .bind(&input.email)
        .bind(&input.address)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_constraint(e, DUPLICATE_NATIONAL_ID))?;

        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Replace every field of an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this id.
    /// Returns `RepositoryError::Conflict` if the national id belongs to another customer.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: CustomerId,
        input: &NewCustomer,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            r"
            UPDATE customer
            SET name = ?, age = ?, national_id = ?, email = ?, address = ?
            WHERE id = ?
            RETURNING id, name, age, national_id, email, address
            ",
        )
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.national_id)
        .bind(&input.email)
        .bind(&input.address)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_constraint(e, DUPLICATE_NATIONAL_ID))?
        .ok_or(RepositoryError::NotFound("customer"))?;

        tracing::info!(customer_id = %customer.id, "Customer updated");
        Ok(customer)
    }

    /// Delete a customer that has no sales.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no customer has this id.
    /// Returns `RepositoryError::Conflict` if sales reference the customer.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            r"
            DELETE FROM customer
            WHERE id = ?
              AND NOT EXISTS (SELECT 1 FROM sale WHERE sale.customer_id = customer.id)
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_constraint(e, "customer has sales"))?
        .rows_affected();

        if deleted == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customer WHERE id = ?)")
                    .bind(id)
                    .fetch_one(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Err(if exists {
                RepositoryError::Conflict("customer has sales".to_owned())
            } else {
                RepositoryError::NotFound("customer")
            });
        }

        tx.commit().await?;
        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use loja_core::{Email, NationalId};

    use super::*;
    use crate::db::test_pool;

    fn maria() -> NewCustomer {
        NewCustomer {
            name: "Maria Souza".to_owned(),
            age: 34,
            national_id: NationalId::parse("529.982.247-25").unwrap(),
            email: Email::parse("maria@loja.com.br").unwrap(),
            address: "Rua das Flores, 10 - Recife".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        let input = maria();
        let created = repo.create(&input).await.unwrap();
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, input.name);
        assert_eq!(fetched.age, input.age);
        assert_eq!(fetched.national_id, input.national_id);
        assert_eq!(fetched.email, input.email);
        assert_eq!(fetched.address, input.address);
    }

    #[tokio::test]
    async fn test_duplicate_national_id_is_conflict() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        repo.create(&maria()).await.unwrap();
        let err = repo.create(&maria()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);

        let err = repo.update(CustomerId::new(99), &maria()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound("customer")));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);
        let created = repo.create(&maria()).await.unwrap();

        let mut changed = maria();
        changed.age = 35;
        changed.address = "Av. Boa Viagem, 200 - Recife".to_owned();
        let updated = repo.update(created.id, &changed).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.age, 35);
        assert_eq!(updated.address, "Av. Boa Viagem, 200 - Recife");
    }

    #[tokio::test]
    async fn test_delete_and_first() {
        let pool = test_pool().await;
        let repo = CustomerRepository::new(&pool);
        assert!(repo.first().await.unwrap().is_none());

        let created = repo.create(&maria()).await.unwrap();
        assert_eq!(repo.first().await.unwrap().map(|c| c.id), Some(created.id));
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(created.id).await.unwrap_err(),
            RepositoryError::NotFound("customer")
        ));
    }
}
