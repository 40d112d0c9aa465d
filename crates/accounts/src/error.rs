//! The module contains the errors the accounts service can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when a form does not clean, carrying every field
//!   error collected.
//! - [`KeyNotFound`] thrown when a user is not found.
//! - [`Hashing`] thrown when the password hasher fails.
//!
//!  [`Validation`]: AccountsError::Validation
//!  [`KeyNotFound`]: AccountsError::KeyNotFound
//!  [`Hashing`]: AccountsError::Hashing
use sea_orm::DbErr;
use thiserror::Error;

use crate::forms::FormErrors;

/// Accounts custom errors.
#[derive(Error, Debug)]
pub enum AccountsError {
    #[error("Invalid form: {0}")]
    Validation(FormErrors),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<FormErrors> for AccountsError {
    fn from(value: FormErrors) -> Self {
        Self::Validation(value)
    }
}

impl PartialEq for AccountsError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Hashing(a), Self::Hashing(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
