//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog_core::config::{AppConfig, MetadataConfig};
use catalog_core::{NewProduct, NewReview, ReviewStatus};
use catalog_metadata::{CatalogStore, ProductRepo, ReviewRepo, SqliteStore};
use catalog_server::{AppState, create_router};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use time::OffsetDateTime;
use tower::ServiceExt;

/// Raw admin token whose hash is configured by `AppConfig::for_testing`.
#[allow(dead_code)]
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub sqlite: Arc<SqliteStore>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server backed by a temporary database.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server with custom config modifications.
    pub async fn with_config<F>(modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let db_path = temp_dir.path().join("catalog.db");
        let sqlite = Arc::new(
            SqliteStore::new(&db_path, None)
                .await
                .expect("Failed to create catalog store"),
        );

        let mut config = AppConfig {
            metadata: MetadataConfig::Sqlite {
                path: db_path,
                query_timeout_secs: None,
            },
            ..AppConfig::for_testing()
        };
        modifier(&mut config);

        let store: Arc<dyn CatalogStore> = sqlite.clone();
        let state = AppState::new(config, store);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            sqlite,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying store.
    pub fn store(&self) -> Arc<dyn CatalogStore> {
        self.state.store.clone()
    }

    /// Insert a product directly, bypassing the API.
    pub async fn seed_product(&self, name: &str, category: &str) -> i64 {
        let product = NewProduct::new(name, category, 10.0, None).unwrap();
        self.state
            .store
            .create_product(&product, OffsetDateTime::now_utc())
            .await
            .expect("Failed to seed product")
            .product_id
    }

    /// Insert a review directly and move it to `status`.
    pub async fn seed_review(&self, product_id: i64, rating: i64, status: ReviewStatus) -> i64 {
        let review = NewReview::new(rating, "seeded", "Seed").unwrap();
        let now = OffsetDateTime::now_utc();
        let row = self
            .state
            .store
            .create_review(product_id, &review, now)
            .await
            .expect("Failed to seed review")
            .review;
        if status != ReviewStatus::Pending {
            self.state
                .store
                .update_review_status(row.review_id, ReviewStatus::Pending, status, now)
                .await
                .expect("Failed to moderate seeded review");
        }
        row.review_id
    }

    /// Send a JSON request through the router.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        auth_token: Option<&str>,
    ) -> (StatusCode, Value) {
        json_request(&self.router, method, uri, body, auth_token).await
    }
}

/// Helper to make JSON requests.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    auth_token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = auth_token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
