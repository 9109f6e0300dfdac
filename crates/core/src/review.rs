//! Review types and moderation lifecycle.

use crate::error::{Error, Result};
use crate::{MAX_COMMENT_LEN, MAX_USER_NAME_LEN, NO_RATING};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Moderation status of a review.
///
/// Reviews are created `Pending`. Moderation moves them to `Approved` or
/// `Rejected`, both terminal. Only approved reviews are visible to customers
/// and counted in a product's aggregate rating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Awaiting moderation.
    Pending,
    /// Visible and counted in the aggregate rating.
    Approved,
    /// Hidden and never counted.
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parse from the stored string form.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }

    /// Check if the status is final.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether moderation may move a review from `self` to `next`.
    pub fn can_transition_to(&self, next: ReviewStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }

    /// Whether a review in this status counts toward the product rating.
    pub fn counts_toward_rating(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A star rating between 1 and 5 inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(Error::InvalidRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated input for a new review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewReview {
    pub rating: Rating,
    pub comment: String,
    pub user_name: String,
}

impl NewReview {
    /// Validate raw submission fields.
    ///
    /// Comment and user name are trimmed; both must be non-empty after
    /// trimming and within their length limits.
    pub fn new(rating: i64, comment: &str, user_name: &str) -> Result<Self> {
        let rating = Rating::new(rating)?;

        let comment = comment.trim();
        if comment.is_empty() {
            return Err(Error::validation("comment", "must not be empty"));
        }
        if comment.chars().count() > MAX_COMMENT_LEN {
            return Err(Error::validation(
                "comment",
                format!("must be at most {MAX_COMMENT_LEN} characters"),
            ));
        }

        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(Error::validation("userName", "must not be empty"));
        }
        if user_name.chars().count() > MAX_USER_NAME_LEN {
            return Err(Error::validation(
                "userName",
                format!("must be at most {MAX_USER_NAME_LEN} characters"),
            ));
        }

        Ok(Self {
            rating,
            comment: comment.to_string(),
            user_name: user_name.to_string(),
        })
    }
}

/// Arithmetic mean of the given ratings, or [`NO_RATING`] when empty.
pub fn average_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return NO_RATING;
    }
    let sum: u64 = ratings.iter().map(|r| u64::from(r.value())).sum();
    sum as f64 / ratings.len() as f64
}
