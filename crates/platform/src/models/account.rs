//! Account domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use trustify_core::{AccountId, Email, Role};

/// A platform account (domain type).
///
/// The password hash is deliberately absent; it stays inside the
/// repository layer and the auth service.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Email address, unique across the platform.
    pub email: Email,
    /// Postal address, if provided.
    pub address: Option<String>,
    /// Current role; mutated only by the coordinator.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Account list entry for the admin directory.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    pub address: Option<String>,
    pub role: Role,
    /// Number of stores this account currently owns.
    pub store_count: i64,
    pub created_at: DateTime<Utc>,
}
