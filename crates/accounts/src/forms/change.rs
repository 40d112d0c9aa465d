//! Forms that edit an existing user.
//!
//! Both forms carry the stored password hash as a read-only field. Whatever
//! is submitted in `password`, cleaning hands back the hash the form was
//! built with, so these forms can never replace a password.

use uuid::Uuid;

use crate::{ReadOnlyPasswordHash, User};

use super::{
    EMAIL_MAX_LENGTH, Form, FormErrors,
    fields::clean_email,
};

/// Cleaned output of the change forms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserChanges {
    pub user_id: Uuid,
    pub email: String,
    /// Always the initial stored hash.
    pub password: String,
    /// `None` when the form does not expose the flag.
    pub is_active: Option<bool>,
    pub admin: Option<bool>,
}

/// Values the form was built with.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Initial {
    user_id: Uuid,
    email: String,
    password: String,
}

impl Initial {
    fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            password: user.password.clone(),
        }
    }

    /// Submitted passwords are discarded in favour of the initial hash.
    fn clean_password(&self, _submitted: Option<&str>) -> String {
        self.password.clone()
    }
}

/// Form for updating users from the admin side.
///
/// Bound to a user with [`AdminChangeForm::for_user`]; the public fields start
/// as the stored values and are overwritten with the submitted data.
/// `is_active` and `admin` behave like checkboxes: `false` unless submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminChangeForm {
    initial: Initial,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: bool,
    pub admin: bool,
}

impl AdminChangeForm {
    pub fn for_user(user: &User) -> Self {
        Self {
            initial: Initial::from_user(user),
            email: Some(user.email.clone()),
            password: Some(user.password.clone()),
            is_active: user.is_active,
            admin: user.admin,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.initial.user_id
    }

    pub fn initial_email(&self) -> &str {
        &self.initial.email
    }

    /// What the read-only password field renders.
    pub fn password_display(&self) -> ReadOnlyPasswordHash {
        ReadOnlyPasswordHash::from_hash(&self.initial.password)
    }
}

impl Form for AdminChangeForm {
    type Cleaned = UserChanges;

    fn clean(&self) -> Result<UserChanges, FormErrors> {
        let mut errors = FormErrors::new();
        let email = clean_email(self.email.as_deref(), "email", EMAIL_MAX_LENGTH, &mut errors);
        let password = self.initial.clean_password(self.password.as_deref());

        errors.finish(|| UserChanges {
            user_id: self.initial.user_id,
            email: email.unwrap_or_default(),
            password,
            is_active: Some(self.is_active),
            admin: Some(self.admin),
        })
    }
}

/// Form end users use to update their settings: the email, plus the
/// read-only password hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsUpdateForm {
    initial: Initial,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SettingsUpdateForm {
    pub fn for_user(user: &User) -> Self {
        Self {
            initial: Initial::from_user(user),
            email: Some(user.email.clone()),
            password: Some(user.password.clone()),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.initial.user_id
    }

    pub fn initial_email(&self) -> &str {
        &self.initial.email
    }

    pub fn password_display(&self) -> ReadOnlyPasswordHash {
        ReadOnlyPasswordHash::from_hash(&self.initial.password)
    }
}

impl Form for SettingsUpdateForm {
    type Cleaned = UserChanges;

    fn clean(&self) -> Result<UserChanges, FormErrors> {
        let mut errors = FormErrors::new();
        let email = clean_email(self.email.as_deref(), "email", EMAIL_MAX_LENGTH, &mut errors);
        let password = self.initial.clean_password(self.password.as_deref());

        errors.finish(|| UserChanges {
            user_id: self.initial.user_id,
            email: email.unwrap_or_default(),
            password,
            is_active: None,
            admin: None,
        })
    }
}
