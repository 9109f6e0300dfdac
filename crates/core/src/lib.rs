//! Core domain types for the product catalog service.
//!
//! This crate defines the data model shared by the other crates:
//! - Reviews, ratings and the moderation status lifecycle
//! - Product creation input and validation
//! - Cache key namespaces and the invalidation dependency graph
//! - Configuration types

pub mod cache_key;
pub mod config;
pub mod error;
pub mod product;
pub mod review;

pub use cache_key::{CacheKey, CacheNamespace, KeyMatch};
pub use error::{Error, Result};
pub use product::NewProduct;
pub use review::{NewReview, Rating, ReviewStatus, average_rating};

/// Aggregate rating reported for a product with no approved reviews.
pub const NO_RATING: f64 = 0.0;

/// Maximum length of a review comment, in characters.
pub const MAX_COMMENT_LEN: usize = 2000;

/// Maximum length of a reviewer display name, in characters.
pub const MAX_USER_NAME_LEN: usize = 100;
