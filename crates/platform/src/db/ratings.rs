//! Rating repository (rating ledger).
//!
//! The upsert is a single `INSERT .. ON CONFLICT DO UPDATE` statement, so
//! two concurrent submissions for the same (account, store) pair can never
//! create duplicate rows; the last committed write wins.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

use trustify_core::{AccountId, RatingId, RatingValue, StoreId};

use super::RepositoryError;
use crate::models::{AccountRatingEntry, Rating, StoreRatingEntry};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for rating queries.
#[derive(Debug, sqlx::FromRow)]
struct RatingRow {
    id: i64,
    account_id: i64,
    store_id: i64,
    value: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RatingRow> for Rating {
    type Error = RepositoryError;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        let value = RatingValue::new(row.value).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid rating value in database: {e}"))
        })?;

        Ok(Self {
            id: RatingId::new(row.id),
            account_id: AccountId::new(row.account_id),
            store_id: StoreId::new(row.store_id),
            value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StoreRatingEntryRow {
    account_id: i64,
    account_name: String,
    account_email: String,
    value: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<StoreRatingEntryRow> for StoreRatingEntry {
    type Error = RepositoryError;

    fn try_from(row: StoreRatingEntryRow) -> Result<Self, Self::Error> {
        let value = RatingValue::new(row.value).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid rating value in database: {e}"))
        })?;

        Ok(Self {
            account_id: AccountId::new(row.account_id),
            account_name: row.account_name,
            account_email: row.account_email,
            value,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRatingEntryRow {
    store_id: i64,
    store_name: String,
    store_address: String,
    value: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRatingEntryRow> for AccountRatingEntry {
    type Error = RepositoryError;

    fn try_from(row: AccountRatingEntryRow) -> Result<Self, Self::Error> {
        let value = RatingValue::new(row.value).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid rating value in database: {e}"))
        })?;

        Ok(Self {
            store_id: StoreId::new(row.store_id),
            store_name: row.store_name,
            store_address: row.store_address,
            value,
            created_at: row.created_at,
        })
    }
}

/// Per-store aggregate used by the owner dashboard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedStoreAggregateRow {
    pub store_id: i64,
    pub store_name: String,
    /// Unrounded mean; `NULL` when the store has no ratings.
    pub average: Option<f64>,
    pub total_ratings: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for rating database operations.
pub struct RatingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RatingRepository<'a> {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Submit or overwrite the rating for one (account, store) pair.
    ///
    /// Keeps `created_at` from the first submission; `updated_at` tracks the
    /// last overwrite.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails (including
    /// foreign-key failures for vanished parents).
    pub async fn upsert(
        &self,
        account_id: AccountId,
        store_id: StoreId,
        value: RatingValue,
    ) -> Result<Rating, RepositoryError> {
        let now = Utc::now();
        let row: RatingRow = sqlx::query_as(
            "INSERT INTO rating (account_id, store_id, value, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?4) \
             ON CONFLICT (account_id, store_id) \
             DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at \
             RETURNING id, account_id, store_id, value, created_at, updated_at",
        )
        .bind(account_id.as_i64())
        .bind(store_id.as_i64())
        .bind(value.as_i64())
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Get one account's rating for one store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get(
        &self,
        account_id: AccountId,
        store_id: StoreId,
    ) -> Result<Option<Rating>, RepositoryError> {
        let row: Option<RatingRow> = sqlx::query_as(
            "SELECT id, account_id, store_id, value, created_at, updated_at \
             FROM rating WHERE account_id = ?1 AND store_id = ?2",
        )
        .bind(account_id.as_i64())
        .bind(store_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Delete one account's rating for one store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such rating exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(
        &self,
        account_id: AccountId,
        store_id: StoreId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM rating WHERE account_id = ?1 AND store_id = ?2")
            .bind(account_id.as_i64())
            .bind(store_id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// All ratings for a store with rater details, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<StoreRatingEntry>, RepositoryError> {
        let rows: Vec<StoreRatingEntryRow> = sqlx::query_as(
            "SELECT r.account_id, a.name AS account_name, a.email AS account_email, \
                    r.value, r.created_at \
             FROM rating r \
             JOIN account a ON a.id = r.account_id \
             WHERE r.store_id = ?1 \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(store_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// All ratings submitted by an account with store details, most recent
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<AccountRatingEntry>, RepositoryError> {
        let rows: Vec<AccountRatingEntryRow> = sqlx::query_as(
            "SELECT r.store_id, s.name AS store_name, s.address AS store_address, \
                    r.value, r.created_at \
             FROM rating r \
             JOIN store s ON s.id = r.store_id \
             WHERE r.account_id = ?1 \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(account_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Unrounded mean rating for a store; `None` when unrated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn average_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Option<f64>, RepositoryError> {
        let average: Option<f64> =
            sqlx::query_scalar("SELECT AVG(value) FROM rating WHERE store_id = ?1")
                .bind(store_id.as_i64())
                .fetch_one(self.pool)
                .await?;
        Ok(average)
    }

    /// Per-store aggregates for every store owned by an account, oldest
    /// store first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn aggregates_for_owner(
        &self,
        owner_id: AccountId,
    ) -> Result<Vec<OwnedStoreAggregateRow>, RepositoryError> {
        let rows: Vec<OwnedStoreAggregateRow> = sqlx::query_as(
            "SELECT s.id AS store_id, s.name AS store_name, \
                    AVG(r.value) AS average, COUNT(r.id) AS total_ratings \
             FROM store s \
             LEFT JOIN rating r ON r.store_id = s.id \
             WHERE s.owner_id = ?1 \
             GROUP BY s.id \
             ORDER BY s.created_at ASC, s.id ASC",
        )
        .bind(owner_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Total number of ratings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rating")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Executor-taking operations, composed into transactions by services
    // =========================================================================

    /// Remove every rating attached to a store (explicit cascade step).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete_for_store(
        executor: impl SqliteExecutor<'_>,
        store_id: StoreId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM rating WHERE store_id = ?1")
            .bind(store_id.as_i64())
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove every rating submitted by an account (explicit cascade step).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete_for_account(
        executor: impl SqliteExecutor<'_>,
        account_id: AccountId,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM rating WHERE account_id = ?1")
            .bind(account_id.as_i64())
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
