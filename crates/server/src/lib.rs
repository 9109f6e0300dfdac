//! HTTP API server for the product catalog.
//!
//! This crate provides:
//! - Customer review submission and approved-review reads
//! - Cached product listing, category and detail reads
//! - Rating aggregation over approved reviews
//! - Cache invalidation cascade after every catalog mutation
//! - Admin endpoints (product creation, review moderation)

pub mod auth;
pub mod cache;
pub mod error;
pub mod handlers;
pub mod invalidation;
pub mod metrics;
pub mod rating;
pub mod reviews;
pub mod routes;
pub mod state;

pub use auth::TraceId;
pub use cache::{CacheStore, MemoryCache};
pub use error::ApiError;
pub use invalidation::{CacheInvalidator, InvalidationReport};
pub use rating::RatingAggregator;
pub use reviews::{ReviewLifecycle, ReviewOutcome};
pub use routes::create_router;
pub use state::AppState;
