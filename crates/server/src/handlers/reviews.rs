//! Customer review endpoints.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{
    ReviewOutcomeResponse, ReviewResponse, outcome_to_response, path_id, read_through,
    review_row_to_response,
};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog_core::{CacheKey, NewReview};
use serde::Deserialize;

/// Review submission body.
///
/// Any `status` sent by the client is ignored; new reviews are always pending.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub rating: i64,
    pub comment: String,
    pub user_name: String,
}

/// GET /product/{product_id} - Approved reviews, newest first.
///
/// An unknown product yields an empty list rather than 404.
pub async fn list_product_reviews(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<ReviewResponse>>> {
    let product_id = path_id(path)?;

    let reviews = read_through(&state, CacheKey::reviews(product_id), || async {
        let rows = state.reviews.approved_reviews(product_id).await?;
        rows.into_iter()
            .map(review_row_to_response)
            .collect::<ApiResult<Vec<_>>>()
    })
    .await?;

    Ok(Json(reviews))
}

/// POST /product/{product_id} - Submit a review for moderation.
pub async fn create_review(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ReviewOutcomeResponse>)> {
    let product_id = path_id(path)?;
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let review = NewReview::new(body.rating, &body.comment, &body.user_name)?;
    let outcome = state.reviews.submit_review(product_id, review).await?;

    Ok((StatusCode::CREATED, Json(outcome_to_response(outcome)?)))
}
