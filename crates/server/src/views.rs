//! Conversions from account types to API payloads.

use accounts::{
    PasswordPolicy, ReadOnlyPasswordHash, User,
    forms::{
        EMAIL_HELP_TEXT, EMAIL_MAX_LENGTH, PASSWORD_CONFIRMATION_HELP_TEXT, PASSWORD_HELP_TEXT,
    },
};
use api_types::{
    form::{FieldView, HashItemView, PasswordHashView, SignUpForm},
    user::UserView,
};

pub(crate) fn user_view(user: &User) -> UserView {
    UserView {
        id: user.id,
        email: user.email.clone(),
        is_active: user.is_active,
        admin: user.admin,
        created_at: user.created_at,
    }
}

pub(crate) fn password_view(hash: &ReadOnlyPasswordHash) -> PasswordHashView {
    let (status, items) = match hash {
        ReadOnlyPasswordHash::Unset => ("unset", Vec::new()),
        ReadOnlyPasswordHash::Invalid => ("invalid", Vec::new()),
        ReadOnlyPasswordHash::Summary { items } => (
            "summary",
            items
                .iter()
                .map(|item| HashItemView {
                    label: item.label.clone(),
                    value: item.value.clone(),
                })
                .collect(),
        ),
    };

    PasswordHashView {
        status: status.to_string(),
        items,
        text: hash.to_string(),
        help_text: PASSWORD_HELP_TEXT.to_string(),
    }
}

pub(crate) fn signup_form_view(policy: &PasswordPolicy) -> SignUpForm {
    SignUpForm {
        email: FieldView {
            help_text: EMAIL_HELP_TEXT.to_string(),
            max_length: Some(EMAIL_MAX_LENGTH),
        },
        password1: FieldView {
            help_text: policy.help_texts().join(" "),
            max_length: None,
        },
        password2: FieldView {
            help_text: PASSWORD_CONFIRMATION_HELP_TEXT.to_string(),
            max_length: None,
        },
    }
}
