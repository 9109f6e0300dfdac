//! Integration tests for cached catalog reads and their invalidation.

mod common;

use axum::http::StatusCode;
use catalog_core::ReviewStatus;
use common::{ADMIN_TOKEN, TestServer};
use serde_json::json;

#[tokio::test]
async fn test_reads_populate_their_cache_keys() {
    let server = TestServer::new().await;
    let lamp = server.seed_product("Lamp", "home").await;
    server.seed_product("Spade", "garden").await;

    let (status, all) = server.request("GET", "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, garden) = server
        .request("GET", "/products?category=garden", None, None)
        .await;
    assert_eq!(garden.as_array().unwrap().len(), 1);
    assert_eq!(garden[0]["name"], "Spade");

    let (_, categories) = server
        .request("GET", "/products/categories", None, None)
        .await;
    assert_eq!(categories, json!(["garden", "home"]));

    server
        .request("GET", &format!("/products/{lamp}"), None, None)
        .await;
    server
        .request("GET", &format!("/product/{lamp}"), None, None)
        .await;

    let mut keys = server.state.cache.keys();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "product_categories".to_string(),
            format!("product_details_{lamp}"),
            "products_list".to_string(),
            "products_list_garden".to_string(),
            format!("reviews_{lamp}"),
        ]
    );
}

#[tokio::test]
async fn test_cached_read_is_served_until_invalidated() {
    let server = TestServer::new().await;
    server.seed_product("Lamp", "home").await;

    let (_, first) = server.request("GET", "/products", None, None).await;
    assert_eq!(first.as_array().unwrap().len(), 1);

    // A write that bypasses the API leaves the cached listing in place.
    server.seed_product("Chair", "home").await;
    let (_, cached) = server.request("GET", "/products", None, None).await;
    assert_eq!(cached.as_array().unwrap().len(), 1);

    // Creating through the admin API runs the list cascade.
    let (status, _) = server
        .request(
            "POST",
            "/v1/admin/products",
            Some(json!({"name": "Desk", "category": "office", "price": 150.0})),
            Some(ADMIN_TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, fresh) = server.request("GET", "/products", None, None).await;
    assert_eq!(fresh.as_array().unwrap().len(), 3);
    let (_, categories) = server
        .request("GET", "/products/categories", None, None)
        .await;
    assert_eq!(categories, json!(["home", "office"]));
}

#[tokio::test]
async fn test_review_submission_clears_dependent_caches() {
    let server = TestServer::new().await;
    let lamp = server.seed_product("Lamp", "home").await;
    let spade = server.seed_product("Spade", "garden").await;

    for uri in [
        "/products".to_string(),
        "/products?category=home".to_string(),
        "/products/categories".to_string(),
        format!("/products/{lamp}"),
        format!("/product/{lamp}"),
        format!("/products/{spade}"),
        format!("/product/{spade}"),
    ] {
        let (status, _) = server.request("GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }

    let (status, _) = server
        .request(
            "POST",
            &format!("/product/{lamp}"),
            Some(json!({"rating": 5, "comment": "warm", "userName": "Ed"})),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Only the other product's own entries survive.
    let mut keys = server.state.cache.keys();
    keys.sort();
    assert_eq!(
        keys,
        vec![format!("product_details_{spade}"), format!("reviews_{spade}")]
    );
}

#[tokio::test]
async fn test_product_detail_reflects_moderated_rating() {
    let server = TestServer::new().await;
    let lamp = server.seed_product("Lamp", "home").await;
    server.seed_review(lamp, 2, ReviewStatus::Approved).await;
    let pending = server.seed_review(lamp, 4, ReviewStatus::Pending).await;

    // Warm the detail view with the stale stored rating.
    let (_, before) = server
        .request("GET", &format!("/products/{lamp}"), None, None)
        .await;
    assert_eq!(before["rating"], 0.0);

    let (status, _) = server
        .request(
            "PUT",
            &format!("/v1/admin/reviews/{pending}/status"),
            Some(json!({"status": "approved"})),
            Some(ADMIN_TOKEN),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = server
        .request("GET", &format!("/products/{lamp}"), None, None)
        .await;
    assert_eq!(after["rating"], 3.0);
}

#[tokio::test]
async fn test_missing_product_detail_is_not_cached() {
    let server = TestServer::new().await;

    let (status, body) = server.request("GET", "/products/77", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "product_not_found");
    assert!(server.state.cache.keys().is_empty());
}

#[tokio::test]
async fn test_health_and_metrics_endpoints() {
    let server = TestServer::new().await;

    let (status, body) = server.request("GET", "/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let disabled = TestServer::with_config(|config| {
        config.server.metrics_enabled = false;
    })
    .await;
    let (status, _) = disabled.request("GET", "/metrics", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_filter_is_trimmed() {
    let server = TestServer::new().await;
    server.seed_product("Spade", "garden").await;

    let (status, padded) = server
        .request("GET", "/products?category=%20garden%20", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(padded.as_array().unwrap().len(), 1);
    assert_eq!(padded[0]["name"], "Spade");

    let (_, blank) = server
        .request("GET", "/products?category=%20", None, None)
        .await;
    assert_eq!(blank.as_array().unwrap().len(), 1);

    let mut keys = server.state.cache.keys();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "products_list".to_string(),
            "products_list_garden".to_string()
        ]
    );
}
