//! Prometheus metrics for the catalog server.
//!
//! Exposes counters for review submissions, moderation decisions, rating
//! recomputations and read-cache effectiveness.
//!
//! The `/metrics` endpoint is unauthenticated so Prometheus can scrape it;
//! restrict it at the network level when `server.metrics_enabled` is on.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{LazyLock, Once};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

pub static REVIEWS_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_reviews_created_total",
        "Total number of reviews submitted",
    )
    .expect("metric creation failed")
});

pub static REVIEWS_MODERATED: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "catalog_reviews_moderated_total",
            "Total number of moderation decisions by resulting status",
        ),
        &["status"],
    )
    .expect("metric creation failed")
});

pub static RATING_RECOMPUTATIONS: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_rating_recomputations_total",
        "Total number of product rating recomputations",
    )
    .expect("metric creation failed")
});

pub static CACHE_HITS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("catalog_cache_hits_total", "Read cache hits by namespace"),
        &["namespace"],
    )
    .expect("metric creation failed")
});

pub static CACHE_MISSES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("catalog_cache_misses_total", "Read cache misses by namespace"),
        &["namespace"],
    )
    .expect("metric creation failed")
});

pub static CACHE_KEYS_INVALIDATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "catalog_cache_keys_invalidated_total",
        "Total number of cache entries removed by invalidation",
    )
    .expect("metric creation failed")
});

static REGISTER_ONCE: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() {
    REGISTER_ONCE.call_once(|| {
        REGISTRY
            .register(Box::new(REVIEWS_CREATED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(REVIEWS_MODERATED.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(RATING_RECOMPUTATIONS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(CACHE_HITS.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(CACHE_MISSES.clone()))
            .expect("metric registration failed");
        REGISTRY
            .register(Box::new(CACHE_KEYS_INVALIDATED.clone()))
            .expect("metric registration failed");
    });
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        ),
    }
}

/// Record a read-cache lookup outcome.
pub fn record_cache_lookup(namespace: &str, hit: bool) {
    if hit {
        CACHE_HITS.with_label_values(&[namespace]).inc();
    } else {
        CACHE_MISSES.with_label_values(&[namespace]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics_is_idempotent() {
        register_metrics();
        register_metrics();
    }

    #[test]
    fn test_record_cache_lookup() {
        let before = CACHE_HITS.with_label_values(&["test_ns"]).get();
        record_cache_lookup("test_ns", true);
        assert_eq!(CACHE_HITS.with_label_values(&["test_ns"]).get(), before + 1);
    }
}
