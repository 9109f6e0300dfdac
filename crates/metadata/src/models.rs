//! Database models mapping to the catalog schema.

use crate::error::MetadataResult;
use catalog_core::{Rating, ReviewStatus};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Product record.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub description: Option<String>,
    /// Mean of approved review ratings, recomputed on every status change.
    pub rating: f64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Review record.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub review_id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub comment: String,
    pub user_name: String,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl ReviewRow {
    /// Parse the stored moderation status.
    pub fn status(&self) -> MetadataResult<ReviewStatus> {
        Ok(ReviewStatus::parse(&self.status)?)
    }

    /// Parse the stored star rating.
    pub fn rating(&self) -> MetadataResult<Rating> {
        Ok(Rating::new(self.rating)?)
    }
}

/// A review write together with the product rating recomputed in the same
/// transaction.
#[derive(Debug, Clone)]
pub struct RatedReview {
    pub review: ReviewRow,
    pub product_rating: f64,
}
