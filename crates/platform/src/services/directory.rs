//! Directory (read-side listings).
//!
//! Admin listings are count-then-slice under the same filter; the count and
//! the page run as two separate queries, which is accurate enough for
//! directory screens. Averages are rounded here, at the read edge.

use sqlx::SqlitePool;

use trustify_core::{AccountId, StoreId};

use crate::db::{AccountFilter, AccountRepository, StoreFilter, StoreRepository};
use crate::error::{Entity, Error};
use crate::models::{Account, AccountSummary, BrowseStore, Store, StoreSummary};
use crate::pagination::{Page, PageRequest};
use crate::services::aggregation::round_to_tenth;

/// The read-side directory service.
pub struct Directory<'a> {
    pool: &'a SqlitePool,
}

impl<'a> Directory<'a> {
    /// Create a new directory service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// One account by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the account does not exist.
    pub async fn account(&self, id: AccountId) -> Result<Account, Error> {
        AccountRepository::new(self.pool)
            .get_by_id(id)
            .await?
            .ok_or(Error::NotFound(Entity::Account))
    }

    /// One store by ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the store does not exist.
    pub async fn store(&self, id: StoreId) -> Result<Store, Error> {
        StoreRepository::new(self.pool)
            .get_by_id(id)
            .await?
            .ok_or(Error::NotFound(Entity::Store))
    }

    /// One page of the admin account directory, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Repository`] if either query fails.
    pub async fn list_accounts(
        &self,
        filter: &AccountFilter,
        request: PageRequest,
    ) -> Result<Page<AccountSummary>, Error> {
        let repo = AccountRepository::new(self.pool);
        let total = repo.count_filtered(filter).await?;
        let items = repo
            .list(filter, i64::from(request.limit), request.offset())
            .await?;
        Ok(Page::new(items, total, request))
    }

    /// One page of the admin store directory with owner details and rounded
    /// averages, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Repository`] if either query fails.
    pub async fn list_stores(
        &self,
        filter: &StoreFilter,
        request: PageRequest,
    ) -> Result<Page<StoreSummary>, Error> {
        let repo = StoreRepository::new(self.pool);
        let total = repo.count_filtered(filter).await?;
        let mut items = repo
            .list(filter, i64::from(request.limit), request.offset())
            .await?;
        for store in &mut items {
            store.average_rating = store.average_rating.map(round_to_tenth);
        }
        Ok(Page::new(items, total, request))
    }

    /// Every store as seen by a browsing user, with rounded overall averages
    /// and the viewer's own score, sorted by name.
    ///
    /// `query` narrows by a case-insensitive name/address substring.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Repository`] if the query fails.
    pub async fn browse_stores(
        &self,
        viewer: AccountId,
        query: Option<&str>,
    ) -> Result<Vec<BrowseStore>, Error> {
        let mut stores = StoreRepository::new(self.pool).browse(viewer, query).await?;
        for store in &mut stores {
            store.overall_rating = store.overall_rating.map(round_to_tenth);
        }
        Ok(stores)
    }

    /// All stores owned by an account, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the account does not exist.
    pub async fn stores_of_owner(&self, owner_id: AccountId) -> Result<Vec<Store>, Error> {
        if AccountRepository::new(self.pool)
            .get_by_id(owner_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(Entity::Account));
        }

        Ok(StoreRepository::new(self.pool)
            .list_by_owner(owner_id)
            .await?)
    }
}
