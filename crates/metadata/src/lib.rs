//! Persistence layer for the product catalog.
//!
//! This crate provides the stored data model:
//! - Products and their derived aggregate rating
//! - Reviews and their moderation status

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use repos::{ProductRepo, ReviewRepo};
pub use store::{CatalogStore, SqliteStore};

use catalog_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a catalog store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn CatalogStore>> {
    match config {
        MetadataConfig::Sqlite {
            path,
            query_timeout_secs,
        } => {
            let store = SqliteStore::new(path, *query_timeout_secs).await?;
            Ok(Arc::new(store) as Arc<dyn CatalogStore>)
        }
    }
}
