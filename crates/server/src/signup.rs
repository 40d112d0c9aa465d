//! Public sign-up endpoint.

use accounts::PublicSignUpForm;
use api_types::{
    form::SignUpForm,
    user::{SignUp, UserView},
};
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    server::ServerState,
    views::{signup_form_view, user_view},
};

/// Describe the fields of the public sign-up form
pub async fn form(State(state): State<ServerState>) -> Json<SignUpForm> {
    Json(signup_form_view(state.accounts.password_policy()))
}

/// Handle requests for creating an account from the public sign-up form
pub async fn sign_up(
    State(state): State<ServerState>,
    Json(payload): Json<SignUp>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let form = PublicSignUpForm {
        email: payload.email,
        password1: payload.password1,
        password2: payload.password2,
    };
    let user = state.accounts.sign_up(&form).await?;

    Ok((StatusCode::CREATED, Json(user_view(&user))))
}
