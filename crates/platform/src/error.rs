//! Platform error taxonomy.
//!
//! Every core operation returns one of these kinds as a value; nothing here
//! is fatal to the process and no retries happen inside the core. The
//! transport layer owns the mapping from kinds to user-facing codes.

use thiserror::Error;

use trustify_core::{RatingValueError, Role};

use crate::db::RepositoryError;

/// The entity a [`Error::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Account,
    Store,
    Rating,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Account => "account",
            Self::Store => "store",
            Self::Rating => "rating",
        })
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    /// Name of the offending input field.
    pub field: &'static str,
    /// Human-readable description of the rule that failed.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors returned by the coordinator, rating ledger, aggregation engine
/// and directory.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested role change is not a legal transition.
    #[error("invalid role transition: {from} -> {to}")]
    InvalidRoleTransition {
        /// Role the account currently holds.
        from: Role,
        /// Role the operation would have assigned.
        to: Role,
    },

    /// ADMIN accounts never enter or leave the ownership path.
    #[error("admin accounts cannot be changed through the ownership path")]
    ForbiddenRoleChange,

    /// The account still owns stores and cannot be deleted or downgraded.
    #[error("owner still has {count} active store(s)")]
    OwnerHasActiveStores {
        /// Number of stores still owned.
        count: i64,
    },

    /// Rating score outside 1-5.
    #[error(transparent)]
    InvalidRatingValue(#[from] RatingValueError),

    /// No rating exists for the (account, store) pair.
    #[error("rating not found")]
    RatingNotFound,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// The referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(Entity),

    /// One or more input fields failed validation.
    #[error("validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    /// Password hashing failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// Underlying storage failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
