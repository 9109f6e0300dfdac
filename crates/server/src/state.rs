//! Application state shared across handlers.

use crate::cache::{CacheStore, MemoryCache};
use crate::invalidation::CacheInvalidator;
use crate::rating::RatingAggregator;
use crate::reviews::ReviewLifecycle;
use catalog_core::config::AppConfig;
use catalog_metadata::CatalogStore;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Product and review persistence.
    pub store: Arc<dyn CatalogStore>,
    /// Read cache.
    pub cache: Arc<dyn CacheStore>,
    /// Cache invalidation cascade.
    pub invalidator: CacheInvalidator,
    /// Review writes and moderation.
    pub reviews: ReviewLifecycle,
    /// Standalone rating recomputation.
    pub ratings: RatingAggregator,
}

impl AppState {
    /// Create a new application state with a fresh in-memory cache.
    ///
    /// # Panics
    ///
    /// Panics if the cache configuration is invalid.
    pub fn new(config: AppConfig, store: Arc<dyn CatalogStore>) -> Self {
        Self::with_cache(config, store, Arc::new(MemoryCache::new()))
    }

    /// Create a new application state around an existing cache.
    ///
    /// # Panics
    ///
    /// Panics if the cache configuration is invalid.
    pub fn with_cache(
        config: AppConfig,
        store: Arc<dyn CatalogStore>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        if let Err(error) = config.cache.validate() {
            panic!("Invalid cache configuration: {}", error);
        }
        if config.admin.token_hash.is_none() {
            tracing::warn!("No admin token hash configured, admin endpoints are disabled");
        }

        let invalidator = CacheInvalidator::new(cache.clone());
        let reviews = ReviewLifecycle::new(store.clone(), invalidator.clone());
        let ratings = RatingAggregator::new(store.clone());

        Self {
            config: Arc::new(config),
            store,
            cache,
            invalidator,
            reviews,
            ratings,
        }
    }

    /// TTL applied to cached read results.
    pub fn cache_ttl(&self) -> Duration {
        self.config.cache.ttl()
    }
}
