//! Administrative endpoints: product management and review moderation.
//!
//! Every route here sits behind [`crate::auth::admin_auth_middleware`].

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{
    ProductResponse, ReviewOutcomeResponse, ReviewResponse, outcome_to_response, path_id,
    product_row_to_response, review_row_to_response,
};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use catalog_core::{NewProduct, ReviewStatus};
use catalog_metadata::ProductRepo;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Product creation body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /v1/admin/products - Create a product.
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let product = NewProduct::new(
        &body.name,
        &body.category,
        body.price,
        body.description.as_deref(),
    )?;

    let row = state
        .store
        .create_product(&product, OffsetDateTime::now_utc())
        .await?;
    tracing::info!(
        product_id = row.product_id,
        category = %row.category,
        "Product created"
    );
    state.invalidator.invalidate_product_list_cache();

    Ok((StatusCode::CREATED, Json(product_row_to_response(row)?)))
}

/// Result of a rating recomputation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRatingResponse {
    pub product_id: i64,
    pub product_rating: f64,
}

/// POST /v1/admin/products/{product_id}/rating - Recompute a product's rating
/// from its approved reviews.
pub async fn recompute_product_rating(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<ProductRatingResponse>> {
    let product_id = path_id(path)?;

    let product_rating = state.ratings.recompute_average_rating(product_id).await?;
    tracing::info!(
        product_id = product_id,
        rating = product_rating,
        "Product rating recomputed on request"
    );
    state.invalidator.invalidate_product_cache(product_id);

    Ok(Json(ProductRatingResponse {
        product_id,
        product_rating,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListReviewsParams {
    /// Moderation status to list (default: pending).
    pub status: Option<String>,
}

/// GET /v1/admin/reviews - Moderation queue, oldest first.
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ListReviewsParams>,
) -> ApiResult<Json<Vec<ReviewResponse>>> {
    let status = match params.status.as_deref() {
        Some(status) => ReviewStatus::parse(status)?,
        None => ReviewStatus::Pending,
    };

    let reviews = state
        .reviews
        .reviews_with_status(status)
        .await?
        .into_iter()
        .map(review_row_to_response)
        .collect::<ApiResult<Vec<_>>>()?;

    Ok(Json(reviews))
}

/// Moderation decision body.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewStatusRequest {
    pub status: String,
}

/// PUT /v1/admin/reviews/{review_id}/status - Approve or reject a review.
pub async fn update_review_status(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateReviewStatusRequest>, JsonRejection>,
) -> ApiResult<Json<ReviewOutcomeResponse>> {
    let review_id = path_id(path)?;
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let target = ReviewStatus::parse(&body.status)?;

    let outcome = state.reviews.moderate_review(review_id, target).await?;

    Ok(Json(outcome_to_response(outcome)?))
}
