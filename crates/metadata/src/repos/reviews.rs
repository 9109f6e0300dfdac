//! Review repository trait.

use crate::error::MetadataResult;
use crate::models::{RatedReview, ReviewRow};
use async_trait::async_trait;
use catalog_core::{NewReview, ReviewStatus};
use time::OffsetDateTime;

/// Repository for review operations.
#[async_trait]
pub trait ReviewRepo: Send + Sync {
    /// Insert a review in `pending` status and recompute the product rating.
    ///
    /// Both writes commit together or not at all. The product must exist; a
    /// dangling product ID is rejected by the foreign key.
    async fn create_review(
        &self,
        product_id: i64,
        review: &NewReview,
        created_at: OffsetDateTime,
    ) -> MetadataResult<RatedReview>;

    /// Get a review by ID.
    async fn get_review(&self, review_id: i64) -> MetadataResult<Option<ReviewRow>>;

    /// List a product's reviews in one status, newest first.
    async fn list_product_reviews(
        &self,
        product_id: i64,
        status: ReviewStatus,
    ) -> MetadataResult<Vec<ReviewRow>>;

    /// List all reviews in one status, oldest first.
    async fn list_reviews_by_status(&self, status: ReviewStatus) -> MetadataResult<Vec<ReviewRow>>;

    /// Move a review from `from` to `to` and recompute its product's rating.
    ///
    /// The update only applies while the stored status still equals `from`,
    /// and the status change and the rating commit together. Returns
    /// `NotFound` for an unknown review and `InvalidStateTransition` when the
    /// stored status differs.
    async fn update_review_status(
        &self,
        review_id: i64,
        from: ReviewStatus,
        to: ReviewStatus,
        updated_at: OffsetDateTime,
    ) -> MetadataResult<RatedReview>;
}
