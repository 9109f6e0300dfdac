#[path = "../src/api_client.rs"]
#[allow(dead_code)] // Some methods are used by the binary but not by tests
mod api_client;

use api_client::{ApiClient, CreateProductRequest};
use httpmock::Method::{GET, POST, PUT};
use httpmock::MockServer;
use serde_json::json;
use std::net::TcpListener;

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn review_json(review_id: i64, status: &str) -> serde_json::Value {
    json!({
        "reviewId": review_id,
        "productId": 7,
        "rating": 4,
        "comment": "solid",
        "userName": "Al",
        "status": status,
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn api_client_success_paths() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let token = "secret-token";

    let create_product = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/admin/products")
            .header("authorization", format!("Bearer {token}"))
            .json_body(json!({"name": "Lamp", "category": "home", "price": 19.5}));
        then.status(201).json_body(json!({
            "productId": 7,
            "name": "Lamp",
            "category": "home",
            "price": 19.5,
            "rating": 0.0,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }));
    });

    let list_reviews = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/admin/reviews")
            .query_param("status", "pending")
            .header("authorization", format!("Bearer {token}"));
        then.status(200)
            .json_body(json!([review_json(1, "pending"), review_json(2, "pending")]));
    });

    let approve = server.mock(|when, then| {
        when.method(PUT)
            .path("/v1/admin/reviews/1/status")
            .header("authorization", format!("Bearer {token}"))
            .json_body(json!({"status": "approved"}));
        then.status(200).json_body(json!({
            "review": review_json(1, "approved"),
            "productRating": 4.0
        }));
    });

    let health = server.mock(|when, then| {
        when.method(GET).path("/v1/health");
        then.status(200)
            .json_body(json!({"status": "ok", "version": "0.1.0"}));
    });

    let client = ApiClient::new(&server.base_url(), token).unwrap();

    let product = client
        .create_product(CreateProductRequest {
            name: "Lamp".to_string(),
            category: "home".to_string(),
            price: 19.5,
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(product.product_id, 7);
    assert_eq!(product.rating, 0.0);
    assert!(product.description.is_none());

    let reviews = client.list_reviews(Some("pending")).await.unwrap();
    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].review_id, 1);
    assert_eq!(reviews[0].user_name, "Al");

    let outcome = client.set_review_status(1, "approved").await.unwrap();
    assert_eq!(outcome.review.status, "approved");
    assert_eq!(outcome.product_rating, 4.0);

    let status = client.health().await.unwrap();
    assert_eq!(status.status, "ok");

    create_product.assert();
    list_reviews.assert();
    approve.assert();
    health.assert();
}

#[tokio::test]
async fn api_client_returns_error_body_on_failure() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let token = "secret-token";

    server.mock(|when, then| {
        when.method(PUT)
            .path("/v1/admin/reviews/9/status")
            .header("authorization", format!("Bearer {token}"));
        then.status(409)
            .body(r#"{"code":"conflict","message":"review 9 is already approved"}"#);
    });

    let client = ApiClient::new(&server.base_url(), token).unwrap();
    let err = client.set_review_status(9, "rejected").await.unwrap_err();
    assert!(err.to_string().contains("API error (409"));
    assert!(err.to_string().contains("already approved"));
}

#[test]
fn api_client_rejects_invalid_url() {
    assert!(ApiClient::new("not a url", "token").is_err());
}

#[tokio::test]
async fn api_client_recomputes_rating() {
    if !can_bind_localhost() {
        eprintln!("Skipping httpmock tests: cannot bind to localhost");
        return;
    }

    let server = MockServer::start();
    let rerate = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/admin/products/7/rating")
            .header("authorization", "Bearer secret-token");
        then.status(200)
            .json_body(json!({"productId": 7, "productRating": 3.5}));
    });

    let client = ApiClient::new(&server.base_url(), "secret-token").unwrap();
    let rating = client.recompute_rating(7).await.unwrap();
    assert_eq!(rating.product_id, 7);
    assert_eq!(rating.product_rating, 3.5);
    rerate.assert();
}
