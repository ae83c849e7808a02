//! Validated rating score.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a rating score falls outside 1-5.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rating must be between {min} and {max}, got {0}", min = RatingValue::MIN, max = RatingValue::MAX)]
pub struct RatingValueError(pub i64);

/// A single 1-5 star score.
///
/// Construction is the only validation point; a `RatingValue` in hand is
/// always within range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RatingValue(i64);

impl RatingValue {
    /// Lowest accepted score.
    pub const MIN: i64 = 1;
    /// Highest accepted score.
    pub const MAX: i64 = 5;

    /// Create a rating value, rejecting anything outside 1-5.
    ///
    /// # Errors
    ///
    /// Returns [`RatingValueError`] when `value` is outside the range.
    pub const fn new(value: i64) -> Result<Self, RatingValueError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(RatingValueError(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying score.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = RatingValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingValue> for i64 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}
