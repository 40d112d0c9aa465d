//! The dedicated password-change flow the change forms point to.

use crate::PasswordPolicy;

use super::{Form, FormErrors, fields::clean_password};

/// A new raw password that passed validation.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(String);

impl NewPassword {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NewPassword(********)")
    }
}

/// Form to set a user's password from the admin side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdminPasswordChangeForm {
    pub password1: Option<String>,
    pub password2: Option<String>,
}

impl AdminPasswordChangeForm {
    /// Clean against `policy`; `email` is the owner of the password.
    pub fn clean_with(
        &self,
        policy: &PasswordPolicy,
        email: Option<&str>,
    ) -> Result<NewPassword, FormErrors> {
        let mut errors = FormErrors::new();
        let password1 = clean_password(self.password1.as_deref(), "password1", &mut errors);
        let password2 = clean_password(self.password2.as_deref(), "password2", &mut errors);

        if let (Some(p1), Some(p2)) = (&password1, &password2) {
            if p1 != p2 {
                errors.add("password2", "The two password fields didn't match.");
            } else {
                for message in policy.validate(p2, email) {
                    errors.add("password2", message);
                }
            }
        }

        errors.finish(|| NewPassword(password2.unwrap_or_default()))
    }
}

impl Form for AdminPasswordChangeForm {
    type Cleaned = NewPassword;

    fn clean(&self) -> Result<NewPassword, FormErrors> {
        self.clean_with(&PasswordPolicy::default(), None)
    }
}
