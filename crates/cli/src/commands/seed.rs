//! Seed the database with demo customers and products.
//!
//! Seeding is skipped when any customer or product already exists, so running
//! it twice never duplicates rows or trips the unique national id.

use tracing::info;

use loja_admin::db::{CustomerRepository, ProductRepository};
use loja_admin::models::{NewCustomer, ProductInput};
use loja_core::{Email, NationalId, Price};

use super::{CliError, connect};

struct DemoCustomer {
    name: &'static str,
    age: i64,
    national_id: &'static str,
    email: &'static str,
    address: &'static str,
}

struct DemoProduct {
    name: &'static str,
    price: &'static str,
    description: &'static str,
    stock_quantity: i64,
}

const CUSTOMERS: &[DemoCustomer] = &[
    DemoCustomer {
        name: "João Silva",
        age: 34,
        national_id: "529.982.247-25",
        email: "joao.silva@example.com",
        address: "Rua das Flores, 120 - São Paulo",
    },
    DemoCustomer {
        name: "Maria Souza",
        age: 28,
        national_id: "153.509.460-56",
        email: "maria.souza@example.com",
        address: "Av. Brasil, 455 - Rio de Janeiro",
    },
    DemoCustomer {
        name: "Carlos Pereira",
        age: 45,
        national_id: "071.475.830-09",
        email: "carlos.pereira@example.com",
        address: "Rua XV de Novembro, 88 - Curitiba",
    },
];

const PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        name: "Caneca de cerâmica",
        price: "29.90",
        description: "Caneca branca de 300 ml.",
        stock_quantity: 40,
    },
    DemoProduct {
        name: "Camiseta básica",
        price: "59.00",
        description: "Camiseta de algodão, tamanho M.",
        stock_quantity: 25,
    },
    DemoProduct {
        name: "Caderno pautado",
        price: "18.50",
        description: "Caderno com 96 folhas.",
        stock_quantity: 3,
    },
];

/// Insert the demo data set.
///
/// # Errors
///
/// Returns `CliError` if the database cannot be opened or an insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;
    let customers = CustomerRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    if customers.count().await? > 0 || products.count().await? > 0 {
        info!("Database already has data, skipping seed");
        return Ok(());
    }

    for demo in CUSTOMERS {
        let customer = customers.create(&demo.to_input()?).await?;
        info!(id = %customer.id, name = %customer.name, "Customer created");
    }

    for demo in PRODUCTS {
        // Demo products have no image file
        let product = products.create(&demo.to_input()?, "").await?;
        info!(id = %product.id, name = %product.name, "Product created");
    }

    pool.close().await;
    info!(
        customers = CUSTOMERS.len(),
        products = PRODUCTS.len(),
        "Seeding complete!"
    );
    Ok(())
}

impl DemoCustomer {
    fn to_input(&self) -> Result<NewCustomer, CliError> {
        Ok(NewCustomer {
            name: self.name.to_owned(),
            age: self.age,
            national_id: NationalId::parse(self.national_id)
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?,
            email: Email::parse(self.email)
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?,
            address: self.address.to_owned(),
        })
    }
}

impl DemoProduct {
    fn to_input(&self) -> Result<ProductInput, CliError> {
        Ok(ProductInput {
            name: self.name.to_owned(),
            price: Price::parse(self.price)
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?,
            description: self.description.to_owned(),
            stock_quantity: self.stock_quantity,
        })
    }
}
