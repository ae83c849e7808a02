//! Trustify platform core.
//!
//! The account-role and store-ownership lifecycle combined with rating
//! aggregation:
//!
//! - [`services::Coordinator`] - the only component permitted to mutate an
//!   account's role or a store's owner; enforces the USER / `STORE_OWNER` /
//!   ADMIN state machine and performs explicit cascade deletes.
//! - [`services::RatingLedger`] - one rating per (account, store) pair,
//!   upsert semantics, last write wins.
//! - [`services::Aggregation`] - per-store averages and the store-owner
//!   dashboard (mean of per-store means, never a pooled mean).
//! - [`services::Directory`] - filtered, paginated account/store listings.
//! - [`services::AuthService`] - signup, login and password changes.
//!
//! Every mutating operation runs as a single transaction against the
//! `SQLite` store; uniqueness (account email, one rating per account/store
//! pair) is enforced by unique indexes rather than in-process checks. The
//! surrounding transport layer is expected to hand each operation an
//! already-authenticated principal and to translate [`Error`] kinds into
//! user-facing codes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pagination;
pub mod seed;
pub mod services;
pub mod validation;

pub use error::{Entity, Error, FieldError};
pub use pagination::{Page, PageRequest};
