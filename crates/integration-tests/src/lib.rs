//! Integration tests for the Loja admin panel.
//!
//! Each test gets its own [`TestContext`]: a fresh `SQLite` file and upload
//! directory under the system temp dir, the full admin router served on an
//! ephemeral port, and a `reqwest` client that keeps cookies (so flash
//! messages survive the redirect) and does not follow redirects.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p loja-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use reqwest::{Client, Response, StatusCode, redirect};
use secrecy::SecretString;
use sqlx::SqlitePool;

use loja_admin::config::AdminConfig;
use loja_admin::db::{self, CustomerRepository, ProductRepository};
use loja_admin::models::{Customer, NewCustomer, Product, ProductInput};
use loja_admin::{app, state::AppState};
use loja_core::{Email, NationalId, Price};

/// Signing secret used by every test server.
pub const TEST_SESSION_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// A running admin server with its own database.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: SqlitePool,
    pub upload_dir: PathBuf,
    root: PathBuf,
}

impl TestContext {
    /// Start a server on `127.0.0.1:0` backed by a new database.
    pub async fn new() -> Self {
        let root = std::env::temp_dir().join(format!("loja-it-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).expect("create test dir");
        let upload_dir = root.join("uploads");

        let config = AdminConfig {
            database_url: SecretString::from(format!(
                "sqlite://{}",
                root.join("loja.db").display()
            )),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost".to_owned(),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
            upload_dir: upload_dir.clone(),
            max_upload_bytes: 1024 * 1024,
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../admin/static")),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("open test database");
        db::run_migrations(&pool).await.expect("apply migrations");

        let router = app::build(AppState::new(config, pool.clone()))
            .await
            .expect("build router");

        let listener = tokio::net::TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("build HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            pool,
            upload_dir,
            root,
        }
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    /// GET a path, asserting 200, and return the body.
    pub async fn page(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
        resp.text().await.expect("read body")
    }

    /// POST an urlencoded form.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(fields)
            .send()
            .await
            .expect("POST request")
    }

    /// Insert a customer directly through the repository.
    pub async fn insert_customer(&self, name: &str, national_id: &str) -> Customer {
        let input = NewCustomer {
            name: name.to_owned(),
            age: 30,
            national_id: NationalId::parse(national_id).expect("valid national id"),
            email: Email::parse("cliente@example.com").expect("valid email"),
            address: "Rua A, 1".to_owned(),
        };
        CustomerRepository::new(&self.pool)
            .create(&input)
            .await
            .expect("insert customer")
    }

    /// Insert a product directly through the repository.
    pub async fn insert_product(&self, name: &str, stock_quantity: i64) -> Product {
        let input = ProductInput {
            name: name.to_owned(),
            price: Price::parse("10.00").expect("valid price"),
            description: String::new(),
            stock_quantity,
        };
        ProductRepository::new(&self.pool)
            .create(&input, "produto.png")
            .await
            .expect("insert product")
    }

    /// Current stock of a product.
    pub async fn stock_of(&self, product: &Product) -> i64 {
        ProductRepository::new(&self.pool)
            .get_by_id(product.id)
            .await
            .expect("load product")
            .expect("product exists")
            .stock_quantity
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Assert a 303 redirect to `location`.
pub fn assert_redirect(resp: &Response, location: &str) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(location)
    );
}
