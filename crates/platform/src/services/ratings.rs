//! Rating ledger.
//!
//! At most one rating per (account, store) pair: the first submission
//! creates the row, every later one overwrites its value in place. Rating
//! age never matters anywhere downstream, so overwriting loses nothing.

use sqlx::SqlitePool;
use tracing::info;

use trustify_core::{AccountId, RatingValue, StoreId};

use crate::db::{AccountRepository, RatingRepository, StoreRepository};
use crate::error::{Entity, Error};
use crate::models::{AccountRatingEntry, Rating, StoreRatingEntry};

/// The rating ledger service.
pub struct RatingLedger<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RatingLedger<'a> {
    /// Create a new rating ledger.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Submit a rating, or overwrite the caller's previous one for the same
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRatingValue`] for a score outside 1-5 and
    /// [`Error::NotFound`] when the account or store does not exist.
    pub async fn submit(
        &self,
        account_id: AccountId,
        store_id: StoreId,
        value: i64,
    ) -> Result<Rating, Error> {
        let value = RatingValue::new(value)?;

        if AccountRepository::fetch(self.pool, account_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(Entity::Account));
        }
        if StoreRepository::fetch(self.pool, store_id).await?.is_none() {
            return Err(Error::NotFound(Entity::Store));
        }

        let rating = RatingRepository::new(self.pool)
            .upsert(account_id, store_id, value)
            .await?;

        info!(
            account_id = %account_id,
            store_id = %store_id,
            value = rating.value.as_i64(),
            "rating recorded"
        );
        Ok(rating)
    }

    /// The caller's own rating for a store, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the store does not exist.
    pub async fn my_rating(
        &self,
        account_id: AccountId,
        store_id: StoreId,
    ) -> Result<Option<Rating>, Error> {
        if StoreRepository::fetch(self.pool, store_id).await?.is_none() {
            return Err(Error::NotFound(Entity::Store));
        }

        Ok(RatingRepository::new(self.pool)
            .get(account_id, store_id)
            .await?)
    }

    /// Withdraw the caller's rating for a store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RatingNotFound`] when no such rating exists.
    pub async fn withdraw(&self, account_id: AccountId, store_id: StoreId) -> Result<(), Error> {
        RatingRepository::new(self.pool)
            .delete(account_id, store_id)
            .await
            .map_err(|e| match e {
                crate::db::RepositoryError::NotFound => Error::RatingNotFound,
                other => Error::Repository(other),
            })?;

        info!(account_id = %account_id, store_id = %store_id, "rating withdrawn");
        Ok(())
    }

    /// Every rating for a store with rater details, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the store does not exist.
    pub async fn for_store(&self, store_id: StoreId) -> Result<Vec<StoreRatingEntry>, Error> {
        if StoreRepository::fetch(self.pool, store_id).await?.is_none() {
            return Err(Error::NotFound(Entity::Store));
        }

        Ok(RatingRepository::new(self.pool)
            .list_for_store(store_id)
            .await?)
    }

    /// Every rating an account has submitted, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the account does not exist.
    pub async fn for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<AccountRatingEntry>, Error> {
        if AccountRepository::fetch(self.pool, account_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(Entity::Account));
        }

        Ok(RatingRepository::new(self.pool)
            .list_for_account(account_id)
            .await?)
    }
}
