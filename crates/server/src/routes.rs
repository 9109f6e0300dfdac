//! Route configuration.

use crate::auth::{admin_auth_middleware, trace_id_middleware};
use crate::error::error_detail_middleware;
use crate::handlers;
use crate::metrics::metrics_handler;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        // Health check (unauthenticated for load balancers/k8s probes)
        .route("/v1/health", get(handlers::health_check))
        // Catalog reads
        .route("/products", get(handlers::list_products))
        .route("/products/categories", get(handlers::list_categories))
        .route("/products/{product_id}", get(handlers::get_product))
        // Customer reviews
        .route(
            "/product/{product_id}",
            get(handlers::list_product_reviews).post(handlers::create_review),
        );

    let admin_routes = Router::new()
        .route("/v1/admin/products", post(handlers::create_product))
        .route(
            "/v1/admin/products/{product_id}/rating",
            post(handlers::recompute_product_rating),
        )
        .route("/v1/admin/reviews", get(handlers::list_reviews))
        .route(
            "/v1/admin/reviews/{review_id}/status",
            put(handlers::update_review_status),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    let mut router = Router::new().merge(public_routes).merge(admin_routes);

    // SECURITY: when enabled, /metrics must be network-restricted to the
    // Prometheus scrapers.
    if state.config.server.metrics_enabled {
        router = router.route("/metrics", get(metrics_handler));
    }

    // Layers run outermost first: TraceLayer -> trace id -> error details -> handler
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_detail_middleware,
        ))
        .layer(middleware::from_fn(trace_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
