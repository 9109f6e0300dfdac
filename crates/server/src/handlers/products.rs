//! Cached catalog read endpoints.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{ProductResponse, path_id, product_row_to_response, read_through};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Query, State};
use catalog_core::CacheKey;
use catalog_metadata::ProductRepo;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListProductsParams {
    /// Restrict the listing to one category.
    pub category: Option<String>,
}

/// GET /products - List products, optionally filtered by category.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> ApiResult<Json<Vec<ProductResponse>>> {
    let category = params
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let key = match category.as_deref() {
        Some(category) => CacheKey::products_list_for_category(category),
        None => CacheKey::products_list(),
    };

    let products = read_through(&state, key, || async {
        let rows = state.store.list_products(category.as_deref()).await?;
        rows.into_iter()
            .map(product_row_to_response)
            .collect::<ApiResult<Vec<_>>>()
    })
    .await?;

    Ok(Json(products))
}

/// GET /products/categories - Distinct category names, sorted.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let categories = read_through(&state, CacheKey::product_categories(), || async {
        state.store.list_categories().await.map_err(ApiError::from)
    })
    .await?;

    Ok(Json(categories))
}

/// GET /products/{product_id} - Product detail with its aggregate rating.
pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ProductResponse>> {
    let product_id = path_id(path)?;

    let product = read_through(&state, CacheKey::product_details(product_id), || async {
        let row = state
            .store
            .get_product(product_id)
            .await?
            .ok_or(ApiError::ProductNotFound(product_id))?;
        product_row_to_response(row)
    })
    .await?;

    Ok(Json(product))
}
