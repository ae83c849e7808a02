//! Account repository (identity store).
//!
//! Queries are runtime-checked `sqlx` statements against the `account`
//! table. Role changes deliberately have no `&self` method here: they are
//! only reachable through the executor-taking [`AccountRepository::set_role`],
//! which the coordinator calls inside its own transactions.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

use trustify_core::{AccountId, Email, Role};

use super::RepositoryError;
use crate::models::{Account, AccountSummary};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for account queries.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    name: String,
    email: String,
    address: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: Role = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: AccountId::new(row.id),
            name: row.name,
            email,
            address: row.address,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for the admin directory listing.
#[derive(Debug, sqlx::FromRow)]
struct AccountSummaryRow {
    id: i64,
    name: String,
    email: String,
    address: Option<String>,
    role: String,
    store_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountSummaryRow> for AccountSummary {
    type Error = RepositoryError;

    fn try_from(row: AccountSummaryRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: Role = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(Self {
            id: AccountId::new(row.id),
            name: row.name,
            email,
            address: row.address,
            role,
            store_count: row.store_count,
            created_at: row.created_at,
        })
    }
}

const SELECT_ACCOUNT: &str = "SELECT id, name, email, address, role, created_at, updated_at \
                              FROM account";

// =============================================================================
// Filters
// =============================================================================

/// Substring filters for the admin account listing.
///
/// Text filters are case-insensitive contains-matches; `role` matches
/// exactly.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub role: Option<Role>,
}

const FILTER_CLAUSE: &str = "(?1 IS NULL OR instr(lower(a.name), lower(?1)) > 0) \
     AND (?2 IS NULL OR instr(lower(a.email), lower(?2)) > 0) \
     AND (?3 IS NULL OR instr(lower(coalesce(a.address, '')), lower(?3)) > 0) \
     AND (?4 IS NULL OR a.role = ?4)";

// =============================================================================
// Repository
// =============================================================================

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Self::fetch(self.pool, id).await
    }

    /// Get an account by its email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        Self::fetch_by_email(self.pool, email).await
    }

    /// Get an account together with its password hash, by email.
    ///
    /// Returns `None` if no account carries this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct WithHashRow {
            #[sqlx(flatten)]
            account: AccountRow,
            password_hash: String,
        }

        let row: Option<WithHashRow> = sqlx::query_as(
            "SELECT id, name, email, address, role, created_at, updated_at, password_hash \
             FROM account WHERE email = ?1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((r.account.try_into()?, r.password_hash)))
            .transpose()
    }

    /// Get an account's password hash by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn password_hash(&self, id: AccountId) -> Result<String, RepositoryError> {
        let hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM account WHERE id = ?1")
                .bind(id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        hash.ok_or(RepositoryError::NotFound)
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
        address: Option<&str>,
        role: Role,
    ) -> Result<Account, RepositoryError> {
        Self::insert(self.pool, name, email, password_hash, address, role).await
    }

    /// Update an account's profile fields (never the role).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Conflict` if the email is already used by
    /// another account.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: AccountId,
        name: &str,
        email: &Email,
        address: Option<&str>,
    ) -> Result<Account, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(
            "UPDATE account SET name = ?1, email = ?2, address = ?3, updated_at = ?4 \
             WHERE id = ?5 \
             RETURNING id, name, email, address, role, created_at, updated_at",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(address)
        .bind(Utc::now())
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Replace an account's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_password_hash(
        &self,
        id: AccountId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE account SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
                .bind(password_hash)
                .bind(Utc::now())
                .bind(id.as_i64())
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Total number of accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM account")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Number of accounts matching a directory filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_filtered(&self, filter: &AccountFilter) -> Result<i64, RepositoryError> {
        let sql = format!("SELECT COUNT(*) FROM account a WHERE {FILTER_CLAUSE}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(filter.name.as_deref())
            .bind(filter.email.as_deref())
            .bind(filter.address.as_deref())
            .bind(filter.role.map(Role::as_str))
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// One page of the admin account directory, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any row is invalid.
    pub async fn list(
        &self,
        filter: &AccountFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AccountSummary>, RepositoryError> {
        let sql = format!(
            "SELECT a.id, a.name, a.email, a.address, a.role, a.created_at, \
                    (SELECT COUNT(*) FROM store s WHERE s.owner_id = a.id) AS store_count \
             FROM account a \
             WHERE {FILTER_CLAUSE} \
             ORDER BY a.created_at DESC, a.id DESC \
             LIMIT ?5 OFFSET ?6"
        );
        let rows: Vec<AccountSummaryRow> = sqlx::query_as(&sql)
            .bind(filter.name.as_deref())
            .bind(filter.email.as_deref())
            .bind(filter.address.as_deref())
            .bind(filter.role.map(Role::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    // =========================================================================
    // Executor-taking operations, composed into transactions by services
    // =========================================================================

    /// Fetch an account on an arbitrary executor (pool or open transaction).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn fetch(
        executor: impl SqliteExecutor<'_>,
        id: AccountId,
    ) -> Result<Option<Account>, RepositoryError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE id = ?1");
        let row: Option<AccountRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(executor)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Fetch an account by email on an arbitrary executor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn fetch_by_email(
        executor: impl SqliteExecutor<'_>,
        email: &Email,
    ) -> Result<Option<Account>, RepositoryError> {
        let sql = format!("{SELECT_ACCOUNT} WHERE email = ?1");
        let row: Option<AccountRow> = sqlx::query_as(&sql)
            .bind(email.as_str())
            .fetch_optional(executor)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Insert a new account row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(
        executor: impl SqliteExecutor<'_>,
        name: &str,
        email: &Email,
        password_hash: &str,
        address: Option<&str>,
        role: Role,
    ) -> Result<Account, RepositoryError> {
        let now = Utc::now();
        let row: AccountRow = sqlx::query_as(
            "INSERT INTO account (name, email, password_hash, address, role, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) \
             RETURNING id, name, email, address, role, created_at, updated_at",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(address)
        .bind(role.as_str())
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Set an account's role. Coordinator use only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_role(
        executor: impl SqliteExecutor<'_>,
        id: AccountId,
        role: Role,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE account SET role = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(role.as_str())
            .bind(Utc::now())
            .bind(id.as_i64())
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete an account row. The caller is responsible for having removed
    /// dependent ratings in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(
        executor: impl SqliteExecutor<'_>,
        id: AccountId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM account WHERE id = ?1")
            .bind(id.as_i64())
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
