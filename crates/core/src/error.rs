//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid rating: {0} (must be between 1 and 5)")]
    InvalidRating(i64),

    #[error("invalid review status: {0}")]
    InvalidStatus(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
