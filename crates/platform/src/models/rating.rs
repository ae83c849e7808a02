//! Rating domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trustify_core::{AccountId, RatingId, RatingValue, StoreId};

/// A single account's score for one store (domain type).
///
/// At most one row exists per (account, store) pair; resubmitting
/// overwrites the value in place.
#[derive(Debug, Clone, Serialize)]
pub struct Rating {
    pub id: RatingId,
    pub account_id: AccountId,
    pub store_id: StoreId,
    pub value: RatingValue,
    /// When the rating was first submitted.
    pub created_at: DateTime<Utc>,
    /// When the value was last overwritten.
    pub updated_at: DateTime<Utc>,
}

/// A rating as shown on a store owner's dashboard: who rated, and what.
#[derive(Debug, Clone, Serialize)]
pub struct StoreRatingEntry {
    pub account_id: AccountId,
    pub account_name: String,
    pub account_email: String,
    pub value: RatingValue,
    pub created_at: DateTime<Utc>,
}

/// A rating as shown in a user's own history: which store, and what.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRatingEntry {
    pub store_id: StoreId,
    pub store_name: String,
    pub store_address: String,
    pub value: RatingValue,
    pub created_at: DateTime<Utc>,
}
