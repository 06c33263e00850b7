//! Home, reports, database check, health and fallback pages.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

use loja_integration_tests::TestContext;

#[tokio::test]
async fn test_home_page_counts() {
    let ctx = TestContext::new().await;
    ctx.insert_customer("João", "529.982.247-25").await;

    let body = ctx.page("/").await;
    assert!(body.contains("Loja Admin"));
    assert!(body.contains("/clientes"));
}

#[tokio::test]
async fn test_reports_show_sample_figures() {
    let ctx = TestContext::new().await;

    let body = ctx.page("/relatorios").await;
    for name in ["João", "Maria", "Carlos"] {
        assert!(body.contains(name), "missing {name}");
    }
    assert!(body.contains("value=\"8\""));
}

#[tokio::test]
async fn test_db_check_without_customers() {
    let ctx = TestContext::new().await;

    let body = ctx.page("/test_db").await;
    assert_eq!(
        body,
        "Banco de dados está funcionando, mas não há clientes cadastrados."
    );
}

#[tokio::test]
async fn test_db_check_reports_first_customer() {
    let ctx = TestContext::new().await;
    ctx.insert_customer("Maria", "153.509.460-56").await;
    ctx.insert_customer("Carlos", "071.475.830-09").await;

    let body = ctx.page("/test_db").await;
    assert_eq!(
        body,
        "Banco de dados está funcionando! Primeiro cliente: Maria"
    );
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    assert_eq!(ctx.page("/health").await, "ok");
    assert_eq!(ctx.get("/health/ready").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/nao-existe").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_headers_present() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/clientes").await;
    let headers = resp.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("x-request-id").is_some());
    assert!(headers.get("content-security-policy").is_some());
}

#[tokio::test]
async fn test_static_stylesheet_served() {
    let ctx = TestContext::new().await;

    let resp = ctx.get("/static/app.css").await;
    assert_eq!(resp.status(), StatusCode::OK);
}
