//! Store repository (store registry).
//!
//! Creation and deletion always happen inside a coordinator transaction
//! alongside the owner's role change, so those operations only exist in
//! executor-taking form here.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

use trustify_core::{AccountId, Email, Role, StoreId};

use super::RepositoryError;
use crate::models::{BrowseStore, OwnerSummary, Store, StoreSummary};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for store queries.
#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: i64,
    name: String,
    email: String,
    address: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = RepositoryError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: StoreId::new(row.id),
            name: row.name,
            email,
            address: row.address,
            owner_id: AccountId::new(row.owner_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for the admin directory listing.
#[derive(Debug, sqlx::FromRow)]
struct StoreSummaryRow {
    id: i64,
    name: String,
    email: String,
    address: String,
    average_rating: Option<f64>,
    owner_id: i64,
    owner_name: String,
    owner_email: String,
    owner_role: String,
}

impl TryFrom<StoreSummaryRow> for StoreSummary {
    type Error = RepositoryError;

    fn try_from(row: StoreSummaryRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let owner_email = Email::parse(&row.owner_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let owner_role: Role = row.owner_role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: StoreId::new(row.id),
            name: row.name,
            email,
            address: row.address,
            average_rating: row.average_rating,
            owner: OwnerSummary {
                id: AccountId::new(row.owner_id),
                name: row.owner_name,
                email: owner_email,
                role: owner_role,
            },
        })
    }
}

/// Internal row type for the user-facing browse view.
#[derive(Debug, sqlx::FromRow)]
struct BrowseStoreRow {
    id: i64,
    name: String,
    address: String,
    overall_rating: Option<f64>,
    my_rating: Option<i64>,
}

impl From<BrowseStoreRow> for BrowseStore {
    fn from(row: BrowseStoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            name: row.name,
            address: row.address,
            overall_rating: row.overall_rating,
            my_rating: row.my_rating,
        }
    }
}

const SELECT_STORE: &str = "SELECT id, name, email, address, owner_id, created_at, updated_at \
                            FROM store";

// =============================================================================
// Filters
// =============================================================================

/// Substring filters for the admin store listing (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

const FILTER_CLAUSE: &str = "(?1 IS NULL OR instr(lower(s.name), lower(?1)) > 0) \
     AND (?2 IS NULL OR instr(lower(s.email), lower(?2)) > 0) \
     AND (?3 IS NULL OR instr(lower(s.address), lower(?3)) > 0)";

// =============================================================================
// Repository
// =============================================================================

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a store by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<Store>, RepositoryError> {
        Self::fetch(self.pool, id).await
    }

    /// All stores owned by an account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list_by_owner(&self, owner_id: AccountId) -> Result<Vec<Store>, RepositoryError> {
        let sql = format!("{SELECT_STORE} WHERE owner_id = ?1 ORDER BY created_at ASC, id ASC");
        let rows: Vec<StoreRow> = sqlx::query_as(&sql)
            .bind(owner_id.as_i64())
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Update a store's descriptive fields. No lifecycle effects.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: StoreId,
        name: &str,
        email: &Email,
        address: &str,
    ) -> Result<Store, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(
            "UPDATE store SET name = ?1, email = ?2, address = ?3, updated_at = ?4 \
             WHERE id = ?5 \
             RETURNING id, name, email, address, owner_id, created_at, updated_at",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(address)
        .bind(Utc::now())
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Total number of stores.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Number of stores matching a directory filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_filtered(&self, filter: &StoreFilter) -> Result<i64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM store s WHERE {FILTER_CLAUSE}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(filter.name.as_deref())
            .bind(filter.email.as_deref())
            .bind(filter.address.as_deref())
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// One page of the admin store directory with owner details and the raw
    /// (unrounded) average rating, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list(
        &self,
        filter: &StoreFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StoreSummary>, RepositoryError> {
        let sql = format!(
            "SELECT s.id, s.name, s.email, s.address, \
                    AVG(r.value) AS average_rating, \
                    o.id AS owner_id, o.name AS owner_name, \
                    o.email AS owner_email, o.role AS owner_role \
             FROM store s \
             JOIN account o ON o.id = s.owner_id \
             LEFT JOIN rating r ON r.store_id = s.id \
             WHERE {FILTER_CLAUSE} \
             GROUP BY s.id \
             ORDER BY s.created_at DESC, s.id DESC \
             LIMIT ?4 OFFSET ?5"
        );
        let rows: Vec<StoreSummaryRow> = sqlx::query_as(&sql)
            .bind(filter.name.as_deref())
            .bind(filter.email.as_deref())
            .bind(filter.address.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Every store (optionally narrowed by a name/address substring) with
    /// its overall average and the viewer's own rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn browse(
        &self,
        viewer: AccountId,
        query: Option<&str>,
    ) -> Result<Vec<BrowseStore>, RepositoryError> {
        let rows: Vec<BrowseStoreRow> = sqlx::query_as(
            "SELECT s.id, s.name, s.address, \
                    AVG(r.value) AS overall_rating, \
                    (SELECT value FROM rating \
                     WHERE store_id = s.id AND account_id = ?1) AS my_rating \
             FROM store s \
             LEFT JOIN rating r ON r.store_id = s.id \
             WHERE (?2 IS NULL \
                    OR instr(lower(s.name), lower(?2)) > 0 \
                    OR instr(lower(s.address), lower(?2)) > 0) \
             GROUP BY s.id \
             ORDER BY s.name ASC",
        )
        .bind(viewer.as_i64())
        .bind(query)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Executor-taking operations, composed into transactions by services
    // =========================================================================

    /// Fetch a store on an arbitrary executor (pool or open transaction).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn fetch(
        executor: impl SqliteExecutor<'_>,
        id: StoreId,
    ) -> Result<Option<Store>, RepositoryError> {
        let sql = format!("{SELECT_STORE} WHERE id = ?1");
        let row: Option<StoreRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(executor)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Number of stores owned by an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_owner(
        executor: impl SqliteExecutor<'_>,
        owner_id: AccountId,
    ) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store WHERE owner_id = ?1")
            .bind(owner_id.as_i64())
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    /// Insert a new store row bound to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        executor: impl SqliteExecutor<'_>,
        name: &str,
        email: &Email,
        address: &str,
        owner_id: AccountId,
    ) -> Result<Store, RepositoryError> {
        let now = Utc::now();
        let row: StoreRow = sqlx::query_as(
            "INSERT INTO store (name, email, address, owner_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
             RETURNING id, name, email, address, owner_id, created_at, updated_at",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(address)
        .bind(owner_id.as_i64())
        .bind(now)
        .fetch_one(executor)
        .await?;

        row.try_into()
    }

    /// Delete a store row. The caller is responsible for having removed
    /// dependent ratings in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(
        executor: impl SqliteExecutor<'_>,
        id: StoreId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM store WHERE id = ?1")
            .bind(id.as_i64())
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
