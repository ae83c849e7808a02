//! Aggregation engine.
//!
//! Averages are computed over current ledger rows only and rounded half-up
//! to one decimal at the read edge. An unrated store reports `None`, never
//! `0.0`: zero would read as the worst possible score.

use sqlx::SqlitePool;

use trustify_core::{AccountId, StoreId};

use crate::db::{AccountRepository, RatingRepository, StoreRepository};
use crate::error::{Entity, Error};

/// Per-store block of an owner dashboard.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OwnedStoreStats {
    pub store_id: StoreId,
    pub store_name: String,
    /// Rounded mean; `None` while the store is unrated.
    pub average_rating: Option<f64>,
    pub total_ratings: i64,
}

/// Aggregates across every store an owner holds.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OwnerDashboard {
    pub stores: Vec<OwnedStoreStats>,
    /// Mean of the rounded per-store means, itself rounded. Unrated stores
    /// are excluded rather than counted as zero; `None` when no store has
    /// ratings yet.
    pub overall_average: Option<f64>,
    pub total_ratings: i64,
}

/// Platform-wide headline counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PlatformStats {
    pub total_accounts: i64,
    pub total_stores: i64,
    pub total_ratings: i64,
}

/// The aggregation engine.
pub struct Aggregation<'a> {
    pool: &'a SqlitePool,
}

impl<'a> Aggregation<'a> {
    /// Create a new aggregation engine.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// A store's rounded average rating; `None` while unrated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the store does not exist.
    pub async fn average_for_store(&self, store_id: StoreId) -> Result<Option<f64>, Error> {
        if StoreRepository::fetch(self.pool, store_id).await?.is_none() {
            return Err(Error::NotFound(Entity::Store));
        }

        let average = RatingRepository::new(self.pool)
            .average_for_store(store_id)
            .await?;
        Ok(average.map(round_to_tenth))
    }

    /// Aggregates for every store an account owns.
    ///
    /// Works for any existing account; a plain USER simply gets an empty
    /// dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the account does not exist.
    pub async fn owner_dashboard(&self, owner_id: AccountId) -> Result<OwnerDashboard, Error> {
        if AccountRepository::fetch(self.pool, owner_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(Entity::Account));
        }

        let rows = RatingRepository::new(self.pool)
            .aggregates_for_owner(owner_id)
            .await?;

        let mut total_ratings = 0;
        let stores: Vec<OwnedStoreStats> = rows
            .into_iter()
            .map(|row| {
                total_ratings += row.total_ratings;
                OwnedStoreStats {
                    store_id: StoreId::new(row.store_id),
                    store_name: row.store_name,
                    average_rating: row.average.map(round_to_tenth),
                    total_ratings: row.total_ratings,
                }
            })
            .collect();

        let rated: Vec<f64> = stores.iter().filter_map(|s| s.average_rating).collect();
        #[allow(clippy::cast_precision_loss)]
        let overall_average = if rated.is_empty() {
            None
        } else {
            Some(round_to_tenth(
                rated.iter().sum::<f64>() / rated.len() as f64,
            ))
        };

        Ok(OwnerDashboard {
            stores,
            overall_average,
            total_ratings,
        })
    }

    /// Headline counts for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Repository`] if any count query fails.
    pub async fn platform_stats(&self) -> Result<PlatformStats, Error> {
        let total_accounts = AccountRepository::new(self.pool).count().await?;
        let total_stores = StoreRepository::new(self.pool).count().await?;
        let total_ratings = RatingRepository::new(self.pool).count().await?;

        Ok(PlatformStats {
            total_accounts,
            total_stores,
            total_ratings,
        })
    }
}

/// Round half-up to one decimal place. Means of 1-5 scores are always
/// positive, where `f64::round` ties away from zero and half-up coincide.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
