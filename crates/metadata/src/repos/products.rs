//! Product repository trait.

use crate::error::MetadataResult;
use crate::models::ProductRow;
use async_trait::async_trait;
use catalog_core::NewProduct;
use time::OffsetDateTime;

/// Repository for product operations.
#[async_trait]
pub trait ProductRepo: Send + Sync {
    /// Insert a product with no rating yet.
    async fn create_product(
        &self,
        product: &NewProduct,
        created_at: OffsetDateTime,
    ) -> MetadataResult<ProductRow>;

    /// Get a product by ID.
    async fn get_product(&self, product_id: i64) -> MetadataResult<Option<ProductRow>>;

    /// Check whether a product exists.
    async fn product_exists(&self, product_id: i64) -> MetadataResult<bool>;

    /// List products ordered by ID, optionally restricted to one category.
    async fn list_products(&self, category: Option<&str>) -> MetadataResult<Vec<ProductRow>>;

    /// List distinct category names in ascending order.
    async fn list_categories(&self) -> MetadataResult<Vec<String>>;

    /// Rescan the product's reviews and persist the mean of those that count
    /// toward the rating, in one transaction. Returns the new rating.
    async fn recompute_product_rating(
        &self,
        product_id: i64,
        updated_at: OffsetDateTime,
    ) -> MetadataResult<f64>;
}
