use accounts::AccountsError;
use api_types::error::ErrorResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};

pub use server::{ServerState, router, run_with_listener};

mod admin;
mod server;
mod settings;
mod signup;
mod views;

pub mod types {
    pub mod user {
        pub use api_types::user::{
            PasswordChange, SettingsUpdate, SignUp, UserChange, UserNew, UserView, UsersResponse,
        };
    }

    pub mod form {
        pub use api_types::form::{
            FieldView, PasswordHashView, SettingsForm, SignUpForm, UserChangeForm,
        };
    }
}

pub enum ServerError {
    Accounts(AccountsError),
}

fn status_for_accounts_error(err: &AccountsError) -> StatusCode {
    match err {
        AccountsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AccountsError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        AccountsError::Forbidden(_) => StatusCode::FORBIDDEN,
        AccountsError::Hashing(_) | AccountsError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn body_for_accounts_error(err: AccountsError) -> ErrorResponse {
    match err {
        AccountsError::Validation(errors) => ErrorResponse {
            error: "invalid form".to_string(),
            fields: errors.into_inner(),
        },
        AccountsError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            internal_error()
        }
        AccountsError::Hashing(hash_err) => {
            tracing::error!("password hashing error: {hash_err}");
            internal_error()
        }
        other => ErrorResponse {
            error: other.to_string(),
            fields: Default::default(),
        },
    }
}

fn internal_error() -> ErrorResponse {
    ErrorResponse {
        error: "internal server error".to_string(),
        fields: Default::default(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Accounts(err) => {
                (status_for_accounts_error(&err), body_for_accounts_error(err))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<AccountsError> for ServerError {
    fn from(value: AccountsError) -> Self {
        Self::Accounts(value)
    }
}

#[cfg(test)]
mod tests {
    use accounts::FormErrors;

    use super::*;

    #[test]
    fn validation_maps_to_422() {
        let err = AccountsError::Validation(FormErrors::single("email", "required"));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let res = ServerError::from(AccountsError::Forbidden("admin only".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::from(AccountsError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn hashing_maps_to_500() {
        let res = ServerError::from(AccountsError::Hashing("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_body_lists_fields() {
        let body = body_for_accounts_error(AccountsError::Validation(FormErrors::single(
            "password2",
            "Passwords don't match",
        )));
        assert_eq!(body.error, "invalid form");
        assert_eq!(body.fields["password2"], ["Passwords don't match"]);
    }
}
