//! Input validation rules.
//!
//! Field failures are collected, not short-circuited, so a caller sees every
//! offending field at once in [`Error::Validation`].

use trustify_core::Email;

use crate::error::{Error, FieldError};

/// Minimum length of a self-registered account name.
pub const NAME_MIN: usize = 10;
/// Minimum length of an admin-created account name.
pub const ADMIN_NAME_MIN: usize = 2;
/// Maximum length of an account name.
pub const NAME_MAX: usize = 60;
/// Maximum length of an address.
pub const ADDRESS_MAX: usize = 400;
/// Minimum length of a store name.
pub const STORE_NAME_MIN: usize = 10;
/// Password length bounds.
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 16;

/// Collects field-level failures across one input payload.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Require a character-count range on a field.
    pub fn length(&mut self, field: &'static str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min {
            self.fail(field, format!("must be at least {min} characters"));
        } else if len > max {
            self.fail(field, format!("must not exceed {max} characters"));
        }
    }

    /// Require at least `min` characters, with no upper bound.
    pub fn min_length(&mut self, field: &'static str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.fail(field, format!("must be at least {min} characters"));
        }
    }

    /// Require at most `max` characters; empty is allowed.
    pub fn max_length(&mut self, field: &'static str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.fail(field, format!("must not exceed {max} characters"));
        }
    }

    /// Record a missing required field.
    pub fn required(&mut self, field: &'static str, message: &str) {
        self.fail(field, message);
    }

    /// Parse an email, recording a failure instead of returning it.
    pub fn email(&mut self, field: &'static str, value: &str) -> Option<Email> {
        match Email::parse(value) {
            Ok(email) => Some(email),
            Err(e) => {
                self.fail(field, e.to_string());
                None
            }
        }
    }

    /// Password policy: 8-16 characters, at least one uppercase letter and
    /// one character that is neither a letter nor a digit.
    pub fn password(&mut self, field: &'static str, value: &str) {
        self.length(field, value, PASSWORD_MIN, PASSWORD_MAX);
        if !value.chars().any(char::is_uppercase) {
            self.fail(field, "must contain at least one uppercase letter");
        }
        if !value.chars().any(|c| !c.is_alphanumeric()) {
            self.fail(field, "must contain at least one special character");
        }
    }

    /// Finish, returning the raw field failures.
    ///
    /// # Errors
    ///
    /// Returns every collected field failure.
    pub fn finish_fields(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Finish, yielding a value produced during validation.
    ///
    /// `value` is `None` exactly when one of the producing checks (such as
    /// [`Validator::email`]) recorded a failure, so the error list is never
    /// empty on the `Err` path.
    ///
    /// # Errors
    ///
    /// Returns every collected field failure.
    pub fn finish_fields_with<T>(self, value: Option<T>) -> Result<T, Vec<FieldError>> {
        match value {
            Some(v) if self.errors.is_empty() => Ok(v),
            _ => Err(self.errors),
        }
    }

    /// Finish, returning `Error::Validation` when anything failed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with every collected field failure.
    pub fn finish(self) -> Result<(), Error> {
        self.finish_fields().map_err(Error::Validation)
    }

    /// [`Validator::finish_fields_with`], wrapped as [`Error::Validation`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with every collected field failure.
    pub fn finish_with<T>(self, value: Option<T>) -> Result<T, Error> {
        self.finish_fields_with(value).map_err(Error::Validation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn field_names(err: Error) -> Vec<&'static str> {
        match err {
            Error::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_collects_all_failures() {
        let mut v = Validator::new();
        v.length("name", "short", NAME_MIN, NAME_MAX);
        v.password("password", "weak");
        let fields = field_names(v.finish().unwrap_err());
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"password"));
    }

    #[test]
    fn test_password_policy() {
        let mut v = Validator::new();
        v.password("password", "Secret1!");
        assert!(v.finish().is_ok());

        let mut v = Validator::new();
        v.password("password", "secret1!"); // no uppercase
        assert!(v.finish().is_err());

        let mut v = Validator::new();
        v.password("password", "Secret123"); // no special char
        assert!(v.finish().is_err());

        let mut v = Validator::new();
        v.password("password", "S1!"); // too short
        assert!(v.finish().is_err());
    }

    #[test]
    fn test_email_failure_is_recorded() {
        let mut v = Validator::new();
        assert!(v.email("email", "not-an-email").is_none());
        assert!(v.finish().is_err());
    }

    #[test]
    fn test_address_bound() {
        let mut v = Validator::new();
        v.max_length("address", &"a".repeat(ADDRESS_MAX + 1), ADDRESS_MAX);
        assert!(v.finish().is_err());
    }
}
