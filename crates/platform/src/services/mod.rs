//! Platform services.
//!
//! Services are cheap, pool-bound handles constructed per request. The
//! [`Coordinator`] is the only component permitted to mutate an account's
//! `role` or a store's `owner_id`.

pub mod aggregation;
pub mod auth;
pub mod coordinator;
pub mod directory;
pub mod ratings;

pub use aggregation::{Aggregation, OwnedStoreStats, OwnerDashboard, PlatformStats};
pub use auth::{AuthError, AuthService};
pub use coordinator::{
    Coordinator, CreateStoreOutcome, CreateStoreRequest, NewAccount, NewStore,
};
pub use directory::Directory;
pub use ratings::RatingLedger;
