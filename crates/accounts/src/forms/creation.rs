//! Forms that create users: the admin creation form and the public sign-up.

use crate::PasswordPolicy;

use super::{
    EMAIL_MAX_LENGTH, Form, FormErrors,
    fields::{clean_email, clean_password, clean_stripped_password},
};

/// A user ready to be hashed and saved.
///
/// The raw password never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    password: String,
}

impl NewUser {
    pub fn password(&self) -> &str {
        &self.password
    }

    pub(crate) fn into_parts(self) -> (String, String) {
        (self.email, self.password)
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// Form for creating new users from the admin side.
///
/// Includes the email plus a repeated password. Both password entries are
/// plain text inputs and get stripped before they are compared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminCreationForm {
    pub email: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
}

impl Form for AdminCreationForm {
    type Cleaned = NewUser;

    fn clean(&self) -> Result<NewUser, FormErrors> {
        let mut errors = FormErrors::new();
        let email = clean_email(self.email.as_deref(), "email", EMAIL_MAX_LENGTH, &mut errors);
        let password1 =
            clean_stripped_password(self.password1.as_deref(), "password1", &mut errors);
        let password2 =
            clean_stripped_password(self.password2.as_deref(), "password2", &mut errors);

        if let (Some(p1), Some(p2)) = (&password1, &password2)
            && p1 != p2
        {
            errors.add("password2", "Passwords don't match");
        }

        errors.finish(|| NewUser {
            email: email.unwrap_or_default(),
            password: password1.unwrap_or_default(),
        })
    }
}

/// Form end users fill in to sign up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicSignUpForm {
    pub email: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
}

impl PublicSignUpForm {
    /// Clean the form, checking the password against `policy` once both
    /// entries agree.
    pub fn clean_with(&self, policy: &PasswordPolicy) -> Result<NewUser, FormErrors> {
        let mut errors = FormErrors::new();
        let email = clean_email(self.email.as_deref(), "email", EMAIL_MAX_LENGTH, &mut errors);
        let password1 = clean_password(self.password1.as_deref(), "password1", &mut errors);
        let password2 = clean_password(self.password2.as_deref(), "password2", &mut errors);

        if let (Some(p1), Some(p2)) = (&password1, &password2) {
            if p1 != p2 {
                errors.add("password2", "The two password fields didn't match.");
            } else {
                for message in policy.validate(p2, email.as_deref()) {
                    errors.add("password2", message);
                }
            }
        }

        errors.finish(|| NewUser {
            email: email.unwrap_or_default(),
            password: password1.unwrap_or_default(),
        })
    }
}

impl Form for PublicSignUpForm {
    type Cleaned = NewUser;

    fn clean(&self) -> Result<NewUser, FormErrors> {
        self.clean_with(&PasswordPolicy::default())
    }
}
