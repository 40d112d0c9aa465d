use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    /// Public sign-up payload.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SignUp {
        pub email: Option<String>,
        pub password1: Option<String>,
        pub password2: Option<String>,
    }

    /// Payload of the admin creation form.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserNew {
        pub email: Option<String>,
        pub password1: Option<String>,
        pub password2: Option<String>,
    }

    /// Payload of the admin change form.
    ///
    /// `is_active` and `admin` are checkboxes: omitted means `false`.
    /// `password` is accepted but ignored.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserChange {
        pub email: Option<String>,
        pub password: Option<String>,
        #[serde(default)]
        pub is_active: bool,
        #[serde(default)]
        pub admin: bool,
    }

    /// Payload of the settings form. `password` is accepted but ignored.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SettingsUpdate {
        pub email: Option<String>,
        pub password: Option<String>,
    }

    /// Payload of the password change form.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PasswordChange {
        pub password1: Option<String>,
        pub password2: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub email: String,
        pub is_active: bool,
        pub admin: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsersResponse {
        pub users: Vec<UserView>,
    }
}

pub mod form {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HashItemView {
        pub label: String,
        pub value: String,
    }

    /// Rendering of the read-only password field.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PasswordHashView {
        /// `unset`, `invalid` or `summary`.
        pub status: String,
        pub items: Vec<HashItemView>,
        /// Human readable one-liner.
        pub text: String,
        pub help_text: String,
    }

    /// Metadata of one input of a form.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldView {
        pub help_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub max_length: Option<usize>,
    }

    /// Empty public sign-up form.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignUpForm {
        pub email: FieldView,
        pub password1: FieldView,
        pub password2: FieldView,
    }

    /// Current state of the admin change form.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserChangeForm {
        pub id: Uuid,
        pub email: String,
        pub is_active: bool,
        pub admin: bool,
        pub password: PasswordHashView,
    }

    /// Current state of the settings form.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettingsForm {
        pub email: String,
        pub password: PasswordHashView,
    }
}

pub mod error {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: String,
        /// Field errors, keyed by field name.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub fields: BTreeMap<String, Vec<String>>,
    }
}
