//! Cache invalidation cascade.
//!
//! A mutation names the namespace it made stale; the cascade then walks the
//! static dependency graph from [`CacheNamespace::cascade`] and deletes the
//! matching keys in each namespace along the way. Listings are always cleared
//! wholesale rather than only those embedding the affected product.

use crate::cache::CacheStore;
use catalog_core::{CacheNamespace, KeyMatch};
use std::sync::Arc;

/// Outcome of one cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    /// Namespaces visited, in cascade order.
    pub namespaces: Vec<CacheNamespace>,
    /// Keys that held a live entry and were removed.
    pub deleted: Vec<String>,
}

/// Deletes stale cache entries after catalog mutations.
#[derive(Clone)]
pub struct CacheInvalidator {
    cache: Arc<dyn CacheStore>,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }

    /// A product's reviews changed: clears its reviews, its detail view and
    /// every listing.
    pub fn invalidate_reviews_cache(&self, product_id: i64) -> InvalidationReport {
        self.cascade(CacheNamespace::Reviews, Some(product_id))
    }

    /// A product changed: clears its detail view and every listing.
    pub fn invalidate_product_cache(&self, product_id: i64) -> InvalidationReport {
        self.cascade(CacheNamespace::ProductDetails, Some(product_id))
    }

    /// The product set changed: clears every listing and the category list.
    pub fn invalidate_product_list_cache(&self) -> InvalidationReport {
        self.cascade(CacheNamespace::ProductList, None)
    }

    fn cascade(&self, start: CacheNamespace, product_id: Option<i64>) -> InvalidationReport {
        let mut report = InvalidationReport::default();

        for namespace in start.cascade() {
            report.namespaces.push(namespace);
            let Some(matcher) = KeyMatch::for_namespace(namespace, product_id) else {
                continue;
            };

            match matcher {
                KeyMatch::Exact(key) => {
                    if self.cache.delete(&key) {
                        report.deleted.push(key);
                    }
                }
                KeyMatch::Prefix(_) => {
                    for key in self.cache.keys() {
                        if matcher.matches(&key) && self.cache.delete(&key) {
                            report.deleted.push(key);
                        }
                    }
                }
            }
        }

        crate::metrics::CACHE_KEYS_INVALIDATED.inc_by(report.deleted.len() as u64);
        tracing::debug!(
            start = %start,
            product_id = ?product_id,
            deleted = ?report.deleted,
            "Cache invalidation cascade finished"
        );
        report
    }
}
