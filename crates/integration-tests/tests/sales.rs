//! Sales pages and the stock-checked sales transaction end to end.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

use loja_admin::db::{SaleOutcome, SaleRepository};
use loja_admin::models::NewSale;
use loja_core::Quantity;
use loja_integration_tests::{TestContext, assert_redirect};

#[tokio::test]
async fn test_sale_decrements_stock() {
    let ctx = TestContext::new().await;
    let customer = ctx.insert_customer("João", "529.982.247-25").await;
    let product = ctx.insert_product("Caneca", 10).await;

    let form = ctx.page("/venda/nova").await;
    assert!(form.contains("João"));
    assert!(form.contains("Caneca (10 em estoque)"));

    let (customer_id, product_id) = (customer.id.to_string(), product.id.to_string());
    let resp = ctx
        .post_form(
            "/venda/nova",
            &[
                ("cliente_id", customer_id.as_str()),
                ("produto_id", product_id.as_str()),
                ("quantidade", "4"),
            ],
        )
        .await;
    assert_redirect(&resp, "/vendas");

    assert_eq!(ctx.stock_of(&product).await, 6);
    let body = ctx.page("/vendas").await;
    assert!(body.contains("Venda registrada com sucesso!"));
    assert!(body.contains("João"));
    assert!(body.contains("Caneca"));
}

#[tokio::test]
async fn test_insufficient_stock_leaves_state_unchanged() {
    let ctx = TestContext::new().await;
    let customer = ctx.insert_customer("Maria", "153.509.460-56").await;
    let product = ctx.insert_product("Caderno", 3).await;

    let (customer_id, product_id) = (customer.id.to_string(), product.id.to_string());
    let resp = ctx
        .post_form(
            "/venda/nova",
            &[
                ("cliente_id", customer_id.as_str()),
                ("produto_id", product_id.as_str()),
                ("quantidade", "5"),
            ],
        )
        .await;
    assert_redirect(&resp, "/vendas");

    assert_eq!(ctx.stock_of(&product).await, 3);
    assert_eq!(SaleRepository::new(&ctx.pool).count().await.unwrap(), 0);
    let body = ctx.page("/vendas").await;
    assert!(body.contains("Estoque insuficiente para a venda."));
}

#[tokio::test]
async fn test_invalid_sale_form() {
    let ctx = TestContext::new().await;
    let product = ctx.insert_product("Caderno", 3).await;
    let product_id = product.id.to_string();

    let resp = ctx
        .post_form(
            "/venda/nova",
            &[
                ("cliente_id", "999"),
                ("produto_id", product_id.as_str()),
                ("quantidade", "1"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Cliente não encontrado."));
    assert_eq!(ctx.stock_of(&product).await, 3);

    let resp = ctx
        .post_form(
            "/venda/nova",
            &[("cliente_id", "1"), ("produto_id", "1"), ("quantidade", "0")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Quantidade deve ser pelo menos 1.")
    );
}

#[tokio::test]
async fn test_concurrent_sales_never_oversell() {
    let ctx = TestContext::new().await;
    let customer = ctx.insert_customer("Carlos", "071.475.830-09").await;
    let product = ctx.insert_product("Camiseta", 5).await;

    let attempts: Vec<_> = (0..12)
        .map(|_| {
            let pool = ctx.pool.clone();
            let sale = NewSale {
                customer_id: customer.id,
                product_id: product.id,
                quantity: Quantity::new(1).unwrap(),
            };
            tokio::spawn(async move { SaleRepository::new(&pool).record_sale(&sale).await })
        })
        .collect();

    let mut recorded = 0;
    let mut refused = 0;
    for attempt in attempts {
        match attempt.await.unwrap().unwrap() {
            SaleOutcome::Recorded(_) => recorded += 1,
            SaleOutcome::InsufficientStock { available, .. } => {
                assert_eq!(available, 0);
                refused += 1;
            }
        }
    }

    assert_eq!(recorded, 5);
    assert_eq!(refused, 7);
    assert_eq!(ctx.stock_of(&product).await, 0);
    assert_eq!(SaleRepository::new(&ctx.pool).count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_records_with_sales_cannot_be_deleted() {
    let ctx = TestContext::new().await;
    let customer = ctx.insert_customer("João", "529.982.247-25").await;
    let product = ctx.insert_product("Caneca", 10).await;
    let (customer_id, product_id) = (customer.id.to_string(), product.id.to_string());
    ctx.post_form(
        "/venda/nova",
        &[
            ("cliente_id", customer_id.as_str()),
            ("produto_id", product_id.as_str()),
            ("quantidade", "1"),
        ],
    )
    .await;

    let resp = ctx.get(&format!("/cliente/deletar/{}", customer.id)).await;
    assert_redirect(&resp, "/clientes");
    let body = ctx.page("/clientes").await;
    assert!(body.contains("Não é possível deletar um cliente com vendas registradas."));
    assert!(body.contains("João"));

    let resp = ctx.get(&format!("/produto/deletar/{}", product.id)).await;
    assert_redirect(&resp, "/produtos");
    assert_eq!(ctx.stock_of(&product).await, 9);
}
