//! Customer pages: create, validate, edit and delete through the web forms.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

use loja_admin::db::CustomerRepository;
use loja_integration_tests::{TestContext, assert_redirect};

fn customer_fields<'a>(name: &'a str, national_id: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("nome", name),
        ("idade", "41"),
        ("cpf", national_id),
        ("email", "joao@loja.com.br"),
        ("endereco", "Rua Augusta, 500"),
    ]
}

#[tokio::test]
async fn test_create_customer_redirects_with_flash() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post_form("/cliente/novo", &customer_fields("João Silva", "529.982.247-25"))
        .await;
    assert_redirect(&resp, "/clientes");

    let body = ctx.page("/clientes").await;
    assert!(body.contains("Cliente cadastrado com sucesso!"));
    assert!(body.contains("João Silva"));
    assert!(body.contains("529.982.247-25"));

    // Flash is shown once
    let body = ctx.page("/clientes").await;
    assert!(!body.contains("Cliente cadastrado com sucesso!"));
}

#[tokio::test]
async fn test_created_customer_round_trips() {
    let ctx = TestContext::new().await;

    ctx.post_form("/cliente/novo", &customer_fields("Maria Souza", "15350946056"))
        .await;

    let stored = CustomerRepository::new(&ctx.pool)
        .list_all()
        .await
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(stored.name, "Maria Souza");
    assert_eq!(stored.age, 41);
    assert_eq!(stored.national_id.as_str(), "15350946056");
    assert_eq!(stored.email.as_str(), "joao@loja.com.br");
    assert_eq!(stored.address, "Rua Augusta, 500");
}

#[tokio::test]
async fn test_invalid_customer_rerenders_form() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .post_form(
            "/cliente/novo",
            &[("nome", ""), ("idade", "abc"), ("cpf", "123"), ("email", "x")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Nome é obrigatório."));
    assert!(body.contains("field-error"));
    assert_eq!(CustomerRepository::new(&ctx.pool).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_national_id_rejected() {
    let ctx = TestContext::new().await;
    ctx.insert_customer("Carlos Pereira", "071.475.830-09").await;

    let resp = ctx
        .post_form("/cliente/novo", &customer_fields("Outro", "07147583009"))
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("CPF já cadastrado."));
}

#[tokio::test]
async fn test_edit_customer() {
    let ctx = TestContext::new().await;
    let customer = ctx.insert_customer("Carlos", "071.475.830-09").await;
    let path = format!("/cliente/editar/{}", customer.id);

    let form = ctx.page(&path).await;
    assert!(form.contains("value=\"Carlos\""));

    let resp = ctx
        .post_form(&path, &customer_fields("Carlos Pereira", "071.475.830-09"))
        .await;
    assert_redirect(&resp, "/clientes");

    let updated = CustomerRepository::new(&ctx.pool)
        .get_by_id(customer.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Carlos Pereira");
    assert!(ctx.page("/clientes").await.contains("Cliente atualizado com sucesso!"));
}

#[tokio::test]
async fn test_delete_customer() {
    let ctx = TestContext::new().await;
    let customer = ctx.insert_customer("Carlos", "071.475.830-09").await;

    let resp = ctx.get(&format!("/cliente/deletar/{}", customer.id)).await;
    assert_redirect(&resp, "/clientes");

    assert!(ctx.page("/clientes").await.contains("Cliente deletado com sucesso!"));
    assert_eq!(CustomerRepository::new(&ctx.pool).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_customer_is_not_found() {
    let ctx = TestContext::new().await;

    assert_eq!(ctx.get("/cliente/editar/999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(ctx.get("/cliente/deletar/999").await.status(), StatusCode::NOT_FOUND);

    let resp = ctx
        .post_form("/cliente/editar/999", &customer_fields("Ninguém", "529.982.247-25"))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
