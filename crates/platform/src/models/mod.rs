//! Domain types.
//!
//! These types represent validated domain objects separate from database
//! row types; password hashes never leave the repository layer inside them.

pub mod account;
pub mod rating;
pub mod store;

pub use account::{Account, AccountSummary};
pub use rating::{AccountRatingEntry, Rating, StoreRatingEntry};
pub use store::{BrowseStore, OwnerSummary, Store, StoreSummary};
