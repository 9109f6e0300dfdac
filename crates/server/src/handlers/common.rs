//! Shared handler helpers and response bodies.

use crate::error::{ApiError, ApiResult};
use crate::metrics::record_cache_lookup;
use crate::reviews::ReviewOutcome;
use crate::state::AppState;
use axum::extract::rejection::PathRejection;
use catalog_core::{CacheKey, ReviewStatus};
use catalog_metadata::models::{ProductRow, ReviewRow};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Review as exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: i64,
    pub product_id: i64,
    pub rating: i64,
    pub comment: String,
    pub user_name: String,
    pub status: ReviewStatus,
    pub created_at: String,
}

/// Product as exposed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rating: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Body returned by review writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutcomeResponse {
    pub review: ReviewResponse,
    pub product_rating: f64,
}

pub(crate) fn format_timestamp(ts: OffsetDateTime, field: &str) -> ApiResult<String> {
    ts.format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("failed to format {field}: {e}")))
}

pub fn review_row_to_response(row: ReviewRow) -> ApiResult<ReviewResponse> {
    let status = row.status()?;
    Ok(ReviewResponse {
        created_at: format_timestamp(row.created_at, "created_at")?,
        review_id: row.review_id,
        product_id: row.product_id,
        rating: row.rating,
        comment: row.comment,
        user_name: row.user_name,
        status,
    })
}

pub fn product_row_to_response(row: ProductRow) -> ApiResult<ProductResponse> {
    Ok(ProductResponse {
        created_at: format_timestamp(row.created_at, "created_at")?,
        updated_at: format_timestamp(row.updated_at, "updated_at")?,
        product_id: row.product_id,
        name: row.name,
        category: row.category,
        price: row.price,
        description: row.description,
        rating: row.rating,
    })
}

pub fn outcome_to_response(outcome: ReviewOutcome) -> ApiResult<ReviewOutcomeResponse> {
    Ok(ReviewOutcomeResponse {
        review: review_row_to_response(outcome.review)?,
        product_rating: outcome.product_rating,
    })
}

/// Map a malformed path segment to a JSON 400.
pub(crate) fn path_id(path: Result<axum::extract::Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|axum::extract::Path(id)| id)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// Serve `key` from the read cache, or load it and cache the result with
/// the configured TTL.
///
/// Errors from `load` are returned as-is and never cached. An entry that no
/// longer decodes as `T` counts as a miss and is overwritten.
pub async fn read_through<T, F, Fut>(state: &AppState, key: CacheKey, load: F) -> ApiResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let namespace = key.namespace().as_str();

    if let Some(value) = state.cache.get(key.as_str()) {
        match serde_json::from_value::<T>(value) {
            Ok(hit) => {
                tracing::debug!(key = %key, "Cache hit");
                record_cache_lookup(namespace, true);
                return Ok(hit);
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
            }
        }
    }
    tracing::debug!(key = %key, "Cache miss");
    record_cache_lookup(namespace, false);

    let loaded = load().await?;
    match serde_json::to_value(&loaded) {
        Ok(value) => state.cache.set(key.as_str(), value, Some(state.cache_ttl())),
        Err(e) => tracing::warn!(key = %key, error = %e, "Failed to encode cache entry"),
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::config::AppConfig;
    use catalog_metadata::{CatalogStore, SqliteStore};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn state() -> (tempfile::TempDir, AppState) {
        let temp = tempfile::tempdir().unwrap();
        let store: Arc<dyn CatalogStore> = Arc::new(
            SqliteStore::new(temp.path().join("catalog.db"), None)
                .await
                .unwrap(),
        );
        (temp, AppState::new(AppConfig::for_testing(), store))
    }

    #[tokio::test]
    async fn test_read_through_loads_once() {
        let (_temp, state) = state().await;
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Vec<String> = read_through(&state, CacheKey::product_categories(), || async {
                loads.fetch_add(1, Ordering::SeqCst);
                Ok(vec!["garden".to_string()])
            })
            .await
            .unwrap();
            assert_eq!(value, vec!["garden".to_string()]);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(
            state.cache.get("product_categories"),
            Some(json!(["garden"]))
        );
    }

    #[tokio::test]
    async fn test_read_through_does_not_cache_errors() {
        let (_temp, state) = state().await;

        let result: ApiResult<ProductResponse> =
            read_through(&state, CacheKey::product_details(4), || async {
                Err(ApiError::ProductNotFound(4))
            })
            .await;

        assert!(matches!(result, Err(ApiError::ProductNotFound(4))));
        assert!(state.cache.get("product_details_4").is_none());
    }

    #[tokio::test]
    async fn test_read_through_replaces_undecodable_entry() {
        let (_temp, state) = state().await;
        state
            .cache
            .set("product_categories", json!({"not": "a list"}), None);

        let value: Vec<String> = read_through(&state, CacheKey::product_categories(), || async {
            Ok(vec!["toys".to_string()])
        })
        .await
        .unwrap();

        assert_eq!(value, vec!["toys".to_string()]);
        assert_eq!(state.cache.get("product_categories"), Some(json!(["toys"])));
    }
}
