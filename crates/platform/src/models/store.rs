//! Store domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trustify_core::{AccountId, Email, Role, StoreId};

/// A store (domain type).
///
/// Every store references exactly one owning account, and that account's
/// role is `STORE_OWNER` for as long as it owns at least one store.
#[derive(Debug, Clone, Serialize)]
pub struct Store {
    /// Unique store ID.
    pub id: StoreId,
    /// Store name.
    pub name: String,
    /// Store contact email (not unique; distinct from the owner's email).
    pub email: Email,
    /// Store address.
    pub address: String,
    /// Owning account.
    pub owner_id: AccountId,
    /// When the store was created.
    pub created_at: DateTime<Utc>,
    /// When the store was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Owner details embedded in store listings.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

/// Store list entry for the admin directory.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub id: StoreId,
    pub name: String,
    pub email: Email,
    pub address: String,
    /// Mean rating rounded to one decimal; `None` when the store has no
    /// ratings yet (never rendered as zero stars).
    pub average_rating: Option<f64>,
    pub owner: OwnerSummary,
}

/// Store entry as seen by a browsing user.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseStore {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    /// Overall average, `None` when unrated.
    pub overall_rating: Option<f64>,
    /// The browsing user's own score, if they rated this store.
    pub my_rating: Option<i64>,
}
