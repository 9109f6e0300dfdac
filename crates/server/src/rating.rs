//! Product rating aggregation.

use crate::error::{ApiError, ApiResult};
use catalog_metadata::{CatalogStore, ProductRepo};
use std::sync::Arc;
use time::OffsetDateTime;

/// Recomputes the derived aggregate rating of a product.
///
/// Every call rescans all approved reviews of the product; there is no
/// incremental bookkeeping to drift out of sync. Review writes get the same
/// rescan from the store, inside their own transaction.
#[derive(Clone)]
pub struct RatingAggregator {
    store: Arc<dyn CatalogStore>,
}

impl RatingAggregator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Recompute, persist and return the mean rating of the product's
    /// approved reviews (`0.0` when there are none).
    pub async fn recompute_average_rating(&self, product_id: i64) -> ApiResult<f64> {
        if !self.store.product_exists(product_id).await? {
            return Err(ApiError::ProductNotFound(product_id));
        }

        let rating = self
            .store
            .recompute_product_rating(product_id, OffsetDateTime::now_utc())
            .await?;

        record_recompute(product_id, rating);
        Ok(rating)
    }
}

/// Count and log a rating recomputation.
pub(crate) fn record_recompute(product_id: i64, rating: f64) {
    crate::metrics::RATING_RECOMPUTATIONS.inc();
    tracing::debug!(
        product_id = product_id,
        rating = rating,
        "Product rating recomputed"
    );
}
