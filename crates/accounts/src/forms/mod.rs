//! Account forms.
//!
//! A form holds the raw submitted values as public fields. [`Form::clean`]
//! validates all of them at once and either returns a typed value ready to
//! be saved by [`Accounts`](crate::Accounts) or every field error found.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod change;
mod creation;
mod fields;
mod password_change;

pub use change::{AdminChangeForm, SettingsUpdateForm, UserChanges};
pub use creation::{AdminCreationForm, NewUser, PublicSignUpForm};
pub use fields::{EMAIL_MAX_LENGTH, normalize_email};
pub use password_change::{AdminPasswordChangeForm, NewPassword};

/// Help text of the email field on the public sign-up form.
pub const EMAIL_HELP_TEXT: &str = "Please enter your work email.";

/// Help text of the confirmation entry of a new password.
pub const PASSWORD_CONFIRMATION_HELP_TEXT: &str =
    "Enter the same password as before, for verification.";

/// Help text of the read-only password field on the change forms.
pub const PASSWORD_HELP_TEXT: &str = "Raw passwords are not stored, so there is no way to see \
this user's password, but you can change the password using the password change form.";

pub trait Form {
    type Cleaned;

    /// Validate every field and return the cleaned value.
    fn clean(&self) -> Result<Self::Cleaned, FormErrors>;

    fn is_valid(&self) -> bool {
        self.clean().is_ok()
    }
}

/// Field errors collected while cleaning, keyed by field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors with a single message on `field`.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Messages attached to `field`, empty when the field is clean.
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// `Ok(value)` when nothing was collected.
    pub(crate) fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .iter()
            .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}
