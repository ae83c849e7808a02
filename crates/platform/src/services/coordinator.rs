//! Role/ownership coordinator.
//!
//! Enforces the account state machine (USER <-> `STORE_OWNER`, ADMIN
//! untouchable) and keeps it consistent with the store registry: a role
//! change and its paired store creation or deletion commit together or not
//! at all. Accounts cycle between USER and `STORE_OWNER` indefinitely;
//! stores have a plain create -> update* -> delete lifecycle.
//!
//! Cascade deletes of ratings are explicit statements inside the same
//! transaction as the parent delete.

use sqlx::SqlitePool;
use tracing::info;

use trustify_core::{AccountId, Email, Role, StoreId};

use crate::db::{AccountRepository, RatingRepository, RepositoryError, StoreRepository};
use crate::error::{Entity, Error};
use crate::models::{Account, Store};
use crate::services::auth;
use crate::validation::{
    ADDRESS_MAX, ADMIN_NAME_MIN, NAME_MAX, NAME_MIN, STORE_NAME_MIN, Validator,
};

/// Input for admin-initiated account creation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
}

/// Descriptive fields of a store to be created.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Input for the store-creation operation, which resolves its owner by
/// email.
///
/// `owner_name` and `owner_password` are only consulted (and then required)
/// when no account carries `owner_email` yet.
#[derive(Debug, Clone)]
pub struct CreateStoreRequest {
    pub store: NewStore,
    pub owner_email: String,
    pub owner_name: Option<String>,
    pub owner_password: Option<String>,
}

/// Result of a store creation: the store plus its (possibly promoted or
/// freshly created) owner.
#[derive(Debug, Clone)]
pub struct CreateStoreOutcome {
    pub store: Store,
    pub owner: Account,
}

/// The role/ownership coordinator.
pub struct Coordinator<'a> {
    pool: &'a SqlitePool,
}

impl<'a> Coordinator<'a> {
    /// Create a new coordinator.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Create a plain USER account (admin-initiated path).
    ///
    /// ADMIN accounts are never created here; they exist only through
    /// seeding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for malformed input and
    /// [`Error::DuplicateEmail`] when the email is taken.
    pub async fn create_account(&self, input: NewAccount) -> Result<Account, Error> {
        let mut v = Validator::new();
        v.length("name", &input.name, ADMIN_NAME_MIN, NAME_MAX);
        let email = v.email("email", &input.email);
        v.password("password", &input.password);
        if let Some(address) = &input.address {
            v.max_length("address", address, ADDRESS_MAX);
        }
        let email = v.finish_with(email)?;

        let password_hash = auth::hash_password(&input.password)?;

        let account = AccountRepository::new(self.pool)
            .create(
                &input.name,
                &email,
                &password_hash,
                input.address.as_deref(),
                Role::User,
            )
            .await
            .map_err(duplicate_email)?;

        info!(account_id = %account.id, "account created");
        Ok(account)
    }

    /// Update an account's profile fields. Role is never touched here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a missing account,
    /// [`Error::DuplicateEmail`] when the new email is taken and
    /// [`Error::Validation`] for malformed input.
    pub async fn update_account(
        &self,
        id: AccountId,
        name: &str,
        email: &str,
        address: Option<&str>,
    ) -> Result<Account, Error> {
        let mut v = Validator::new();
        v.length("name", name, ADMIN_NAME_MIN, NAME_MAX);
        let parsed = v.email("email", email);
        if let Some(address) = address {
            v.max_length("address", address, ADDRESS_MAX);
        }
        let parsed = v.finish_with(parsed)?;

        AccountRepository::new(self.pool)
            .update_profile(id, name, &parsed, address)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => Error::NotFound(Entity::Account),
                other => duplicate_email(other),
            })
    }

    /// Delete an account.
    ///
    /// USER accounts delete unconditionally; their ratings cascade away in
    /// the same transaction. `STORE_OWNER` accounts must have shed every
    /// store first. ADMIN accounts are never deleted through this path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a missing account,
    /// [`Error::ForbiddenRoleChange`] for an ADMIN and
    /// [`Error::OwnerHasActiveStores`] while stores remain.
    pub async fn delete_account(&self, id: AccountId) -> Result<(), Error> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let account = AccountRepository::fetch(&mut *tx, id)
            .await?
            .ok_or(Error::NotFound(Entity::Account))?;

        if account.role == Role::Admin {
            return Err(Error::ForbiddenRoleChange);
        }

        let owned = StoreRepository::count_for_owner(&mut *tx, id).await?;
        if owned > 0 {
            return Err(Error::OwnerHasActiveStores { count: owned });
        }

        let removed = RatingRepository::delete_for_account(&mut *tx, id).await?;
        AccountRepository::delete(&mut *tx, id).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(account_id = %id, ratings_removed = removed, "account deleted");
        Ok(())
    }

    // =========================================================================
    // Stores
    // =========================================================================

    /// Promote a USER to `STORE_OWNER` by assigning them a new store.
    ///
    /// The role change and the store insert commit atomically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a missing account and
    /// [`Error::InvalidRoleTransition`] when the account is already a
    /// `STORE_OWNER` or is an ADMIN.
    pub async fn promote_to_owner(
        &self,
        account_id: AccountId,
        store: NewStore,
    ) -> Result<Store, Error> {
        let email = validate_new_store(&store)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let account = AccountRepository::fetch(&mut *tx, account_id)
            .await?
            .ok_or(Error::NotFound(Entity::Account))?;

        if account.role != Role::User {
            return Err(Error::InvalidRoleTransition {
                from: account.role,
                to: Role::StoreOwner,
            });
        }

        AccountRepository::set_role(&mut *tx, account_id, Role::StoreOwner).await?;
        let store =
            StoreRepository::insert(&mut *tx, &store.name, &email, &store.address, account_id)
                .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(account_id = %account_id, store_id = %store.id, "user promoted to store owner");
        Ok(store)
    }

    /// Create a store, resolving its owner by email.
    ///
    /// - existing USER: promoted to `STORE_OWNER` alongside the insert;
    /// - existing `STORE_OWNER`: gains an additional store, no role change;
    /// - existing ADMIN: rejected, admins never enter the ownership path;
    /// - no such account: created directly in `STORE_OWNER` state (the
    ///   account is never observably USER), which requires `owner_name` and
    ///   `owner_password`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`], [`Error::InvalidRoleTransition`] or
    /// [`Error::DuplicateEmail`] as described above.
    pub async fn create_store(
        &self,
        request: CreateStoreRequest,
    ) -> Result<CreateStoreOutcome, Error> {
        let store_email = validate_new_store(&request.store)?;

        let mut v = Validator::new();
        let owner_email = v.email("owner_email", &request.owner_email);
        let owner_email = v.finish_with(owner_email)?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let owner_id = match AccountRepository::fetch_by_email(&mut *tx, &owner_email).await? {
            Some(existing) => match existing.role {
                Role::User => {
                    AccountRepository::set_role(&mut *tx, existing.id, Role::StoreOwner).await?;
                    info!(account_id = %existing.id, "user promoted to store owner");
                    existing.id
                }
                Role::StoreOwner => existing.id,
                Role::Admin => {
                    return Err(Error::InvalidRoleTransition {
                        from: Role::Admin,
                        to: Role::StoreOwner,
                    });
                }
            },
            None => {
                let mut v = Validator::new();
                match &request.owner_name {
                    Some(name) => v.length("owner_name", name, NAME_MIN, NAME_MAX),
                    None => v.required("owner_name", "required when creating a new owner"),
                }
                match &request.owner_password {
                    Some(password) => v.password("owner_password", password),
                    None => v.required("owner_password", "required when creating a new owner"),
                }
                let (name, password) = v.finish_with(
                    request
                        .owner_name
                        .as_deref()
                        .zip(request.owner_password.as_deref()),
                )?;

                let password_hash = auth::hash_password(password)?;
                let owner = AccountRepository::insert(
                    &mut *tx,
                    name,
                    &owner_email,
                    &password_hash,
                    None,
                    Role::StoreOwner,
                )
                .await
                .map_err(duplicate_email)?;
                info!(account_id = %owner.id, "store owner account created");
                owner.id
            }
        };

        let store = StoreRepository::insert(
            &mut *tx,
            &request.store.name,
            &store_email,
            &request.store.address,
            owner_id,
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        let owner = AccountRepository::fetch(self.pool, owner_id)
            .await?
            .ok_or(Error::NotFound(Entity::Account))?;

        info!(store_id = %store.id, owner_id = %owner.id, "store created");
        Ok(CreateStoreOutcome { store, owner })
    }

    /// Update a store's descriptive fields. No lifecycle effects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a missing store and
    /// [`Error::Validation`] for malformed input.
    pub async fn update_store(
        &self,
        id: StoreId,
        name: &str,
        email: &str,
        address: &str,
    ) -> Result<Store, Error> {
        let mut v = Validator::new();
        v.min_length("store_name", name, STORE_NAME_MIN);
        let parsed = v.email("store_email", email);
        v.length("store_address", address, 1, ADDRESS_MAX);
        let parsed = v.finish_with(parsed)?;

        StoreRepository::new(self.pool)
            .update(id, name, &parsed, address)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => Error::NotFound(Entity::Store),
                other => Error::Repository(other),
            })
    }

    /// Delete a store, cascading its ratings and downgrading the owner to
    /// USER when this was their last store.
    ///
    /// All of it commits as one transaction, so an account can never be
    /// observed as a `STORE_OWNER` with zero stores once this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a missing store.
    pub async fn delete_store(&self, id: StoreId) -> Result<(), Error> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let store = StoreRepository::fetch(&mut *tx, id)
            .await?
            .ok_or(Error::NotFound(Entity::Store))?;

        let removed = RatingRepository::delete_for_store(&mut *tx, id).await?;
        StoreRepository::delete(&mut *tx, id).await?;

        let remaining = StoreRepository::count_for_owner(&mut *tx, store.owner_id).await?;
        if remaining == 0 {
            let owner = AccountRepository::fetch(&mut *tx, store.owner_id)
                .await?
                .ok_or(Error::NotFound(Entity::Account))?;
            if owner.role == Role::StoreOwner {
                AccountRepository::set_role(&mut *tx, owner.id, Role::User).await?;
                info!(account_id = %owner.id, "store owner downgraded to user");
            }
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        info!(store_id = %id, ratings_removed = removed, "store deleted");
        Ok(())
    }
}

fn validate_new_store(store: &NewStore) -> Result<Email, Error> {
    let mut v = Validator::new();
    v.min_length("store_name", &store.name, STORE_NAME_MIN);
    let email = v.email("store_email", &store.email);
    v.length("store_address", &store.address, 1, ADDRESS_MAX);
    v.finish_with(email)
}

/// Map a unique-email conflict to its taxonomy kind.
fn duplicate_email(e: RepositoryError) -> Error {
    match e {
        RepositoryError::Conflict(_) => Error::DuplicateEmail,
        other => Error::Repository(other),
    }
}
