//! Server errors expose raw details only outside production.

mod common;

use axum::http::StatusCode;
use catalog_core::config::Environment;
use common::TestServer;
use serde_json::json;

async fn break_reviews_table(server: &TestServer) {
    sqlx::query("DROP TABLE reviews")
        .execute(server.sqlite.pool())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_persistence_failure_includes_details_in_development() {
    let server = TestServer::new().await;
    let product_id = server.seed_product("Lamp", "home").await;
    break_reviews_table(&server).await;

    let (status, body) = server
        .request(
            "POST",
            &format!("/product/{product_id}"),
            Some(json!({"rating": 3, "comment": "ok", "userName": "Al"})),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "persistence_error");
    assert_eq!(body["message"], "internal server error");
    assert!(
        body["details"]
            .as_str()
            .is_some_and(|d| d.contains("reviews"))
    );
}

#[tokio::test]
async fn test_persistence_failure_hides_details_in_production() {
    let server = TestServer::with_config(|config| {
        config.server.environment = Environment::Production;
    })
    .await;
    let product_id = server.seed_product("Lamp", "home").await;
    break_reviews_table(&server).await;

    let (status, body) = server
        .request("GET", &format!("/product/{product_id}"), None, None)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "internal server error");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_client_errors_never_carry_details() {
    let server = TestServer::new().await;

    let (status, body) = server
        .request(
            "POST",
            "/product/5",
            Some(json!({"rating": 3, "comment": "ok", "userName": "Al"})),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("details").is_none());
}
