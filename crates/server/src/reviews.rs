//! Review lifecycle: submission, customer reads and moderation.
//!
//! Every write follows the same sequence: validate, check the product, then
//! persist the review together with the recomputed product rating in one
//! store transaction, then run the invalidation cascade. A failure anywhere
//! before the commit leaves neither rows nor cache changes behind.

use crate::error::{ApiError, ApiResult};
use crate::invalidation::CacheInvalidator;
use crate::rating::record_recompute;
use catalog_core::{NewReview, ReviewStatus};
use catalog_metadata::models::{RatedReview, ReviewRow};
use catalog_metadata::{CatalogStore, ProductRepo, ReviewRepo};
use std::sync::Arc;
use time::OffsetDateTime;

/// A review after a write, with the product rating recomputed alongside it.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub review: ReviewRow,
    pub product_rating: f64,
}

impl From<RatedReview> for ReviewOutcome {
    fn from(rated: RatedReview) -> Self {
        Self {
            review: rated.review,
            product_rating: rated.product_rating,
        }
    }
}

/// Orchestrates review writes and the follow-up cache work.
#[derive(Clone)]
pub struct ReviewLifecycle {
    store: Arc<dyn CatalogStore>,
    invalidator: CacheInvalidator,
}

impl ReviewLifecycle {
    pub fn new(store: Arc<dyn CatalogStore>, invalidator: CacheInvalidator) -> Self {
        Self { store, invalidator }
    }

    /// Submit a customer review. The review always starts `pending`.
    pub async fn submit_review(
        &self,
        product_id: i64,
        review: NewReview,
    ) -> ApiResult<ReviewOutcome> {
        if !self.store.product_exists(product_id).await? {
            return Err(ApiError::ProductNotFound(product_id));
        }

        // A pending review does not change the aggregate, but the rating is
        // recomputed on every review write regardless.
        let outcome: ReviewOutcome = self
            .store
            .create_review(product_id, &review, OffsetDateTime::now_utc())
            .await?
            .into();
        crate::metrics::REVIEWS_CREATED.inc();
        record_recompute(product_id, outcome.product_rating);
        tracing::info!(
            review_id = outcome.review.review_id,
            product_id = product_id,
            rating = outcome.review.rating,
            "Review submitted for moderation"
        );

        self.invalidator.invalidate_reviews_cache(product_id);
        Ok(outcome)
    }

    /// Approved reviews of a product, newest first.
    ///
    /// Unknown products yield an empty list.
    pub async fn approved_reviews(&self, product_id: i64) -> ApiResult<Vec<ReviewRow>> {
        Ok(self
            .store
            .list_product_reviews(product_id, ReviewStatus::Approved)
            .await?)
    }

    /// Reviews awaiting (or past) moderation, oldest first.
    pub async fn reviews_with_status(&self, status: ReviewStatus) -> ApiResult<Vec<ReviewRow>> {
        Ok(self.store.list_reviews_by_status(status).await?)
    }

    /// Apply a moderation decision to a pending review.
    pub async fn moderate_review(
        &self,
        review_id: i64,
        target: ReviewStatus,
    ) -> ApiResult<ReviewOutcome> {
        if !target.is_terminal() {
            return Err(ApiError::Conflict(format!(
                "reviews can only be moved to approved or rejected, not {target}"
            )));
        }

        let current = self
            .store
            .get_review(review_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("review {review_id} not found")))?;
        let from = current.status()?;
        if !from.can_transition_to(target) {
            return Err(ApiError::Conflict(format!(
                "review {review_id} is already {from}"
            )));
        }

        // Conditional on the status read above, so two moderators racing on
        // the same review cannot both succeed.
        let outcome: ReviewOutcome = self
            .store
            .update_review_status(review_id, from, target, OffsetDateTime::now_utc())
            .await?
            .into();
        let product_id = outcome.review.product_id;
        crate::metrics::REVIEWS_MODERATED
            .with_label_values(&[target.as_str()])
            .inc();
        record_recompute(product_id, outcome.product_rating);
        tracing::info!(
            review_id = review_id,
            product_id = product_id,
            status = %target,
            "Review moderated"
        );

        self.invalidator.invalidate_reviews_cache(product_id);
        Ok(outcome)
    }
}
