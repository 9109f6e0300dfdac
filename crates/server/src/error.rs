//! API error types.

use crate::state::AppState;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use catalog_metadata::MetadataError;
use serde::Serialize;

/// Message returned in place of the real cause for server errors.
const GENERIC_SERVER_ERROR: &str = "internal server error";

/// API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Raw diagnostic detail (server errors outside production only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Diagnostic detail of a server error, carried in response extensions until
/// [`error_detail_middleware`] decides whether to expose it.
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    body: ErrorResponse,
    details: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validation failed: {0}")]
    Validation(#[from] catalog_core::Error),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProductNotFound(_) => "product_not_found",
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation_error",
            Self::Unauthorized(_) => "unauthorized",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal_error",
            Self::Metadata(e) => match e {
                MetadataError::NotFound(_) => "not_found",
                MetadataError::InvalidStateTransition { .. } => "conflict",
                _ => "persistence_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ProductNotFound(_) => StatusCode::NOT_FOUND,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Metadata(e) => match e {
                MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
                MetadataError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if !status.is_server_error() {
            let body = ErrorResponse {
                code: self.code().to_string(),
                message: self.to_string(),
                details: None,
            };
            return (status, Json(body)).into_response();
        }

        tracing::error!(code = self.code(), error = %self, "Request failed");

        let body = ErrorResponse {
            code: self.code().to_string(),
            message: GENERIC_SERVER_ERROR.to_string(),
            details: None,
        };
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(ErrorDetails {
            body,
            details: self.to_string(),
        });
        response
    }
}

/// Attach raw error details to server error bodies outside production.
pub async fn error_detail_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let Some(ErrorDetails { body, details }) = response.extensions_mut().remove::<ErrorDetails>()
    else {
        return response;
    };
    if state.config.server.environment.is_production() {
        return response;
    }

    let body = ErrorResponse {
        details: Some(details),
        ..body
    };
    (response.status(), Json(body)).into_response()
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::ProductNotFound(7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation(catalog_core::Error::InvalidRating(9)).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Metadata(MetadataError::InvalidStateTransition {
                from: "approved".to_string(),
                to: "rejected".to_string(),
            })
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Metadata(MetadataError::Database(sqlx::Error::PoolTimedOut)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_error_hides_cause_in_body() {
        let response = ApiError::Internal("disk on fire".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let details = response.extensions().get::<ErrorDetails>().unwrap();
        assert_eq!(details.body.message, GENERIC_SERVER_ERROR);
        assert!(details.details.contains("disk on fire"));
    }

    #[test]
    fn test_client_error_has_no_details() {
        let response = ApiError::ProductNotFound(3).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorDetails>().is_none());
    }
}
