//! Settings endpoints for the authenticated user.

use accounts::User;
use api_types::{
    form::SettingsForm,
    user::{SettingsUpdate, UserView},
};
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError,
    server::ServerState,
    views::{password_view, user_view},
};

/// Render the settings form of the current user
pub async fn get(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<SettingsForm>, ServerError> {
    let form = state.accounts.settings_form(user.id).await?;

    Ok(Json(SettingsForm {
        email: form.initial_email().to_string(),
        password: password_view(&form.password_display()),
    }))
}

/// Save the settings form of the current user
pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<SettingsUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let mut form = state.accounts.settings_form(user.id).await?;
    form.email = payload.email;
    form.password = payload.password;

    let user = state.accounts.update_settings(&form).await?;
    Ok(Json(user_view(&user)))
}
