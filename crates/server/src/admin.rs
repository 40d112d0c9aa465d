//! Admin user management endpoints (admin-only).

use accounts::{AccountsError, AdminCreationForm, AdminPasswordChangeForm, User};
use api_types::{
    form::UserChangeForm,
    user::{PasswordChange, UserChange, UserNew, UserView, UsersResponse},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    views::{password_view, user_view},
};

pub async fn list(State(state): State<ServerState>) -> Result<Json<UsersResponse>, ServerError> {
    let users = state
        .accounts
        .list_users()
        .await?
        .iter()
        .map(user_view)
        .collect();

    Ok(Json(UsersResponse { users }))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let form = AdminCreationForm {
        email: payload.email,
        password1: payload.password1,
        password2: payload.password2,
    };
    let user = state.accounts.create_user(&form).await?;

    Ok((StatusCode::CREATED, Json(user_view(&user))))
}

pub async fn change_form(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserChangeForm>, ServerError> {
    let form = state.accounts.change_form(id).await?;

    Ok(Json(UserChangeForm {
        id: form.user_id(),
        email: form.initial_email().to_string(),
        is_active: form.is_active,
        admin: form.admin,
        password: password_view(&form.password_display()),
    }))
}

/// Save the change form of a user.
///
/// Admins cannot deactivate themselves or drop their own admin flag.
pub async fn update(
    Extension(actor): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserChange>,
) -> Result<Json<UserView>, ServerError> {
    if actor.id == id && !(payload.is_active && payload.admin) {
        tracing::warn!(user_id = %actor.id, "admin self-demotion refused");
        return Err(AccountsError::Forbidden(
            "admins cannot deactivate or demote themselves".to_string(),
        )
        .into());
    }

    let mut form = state.accounts.change_form(id).await?;
    form.email = payload.email;
    form.password = payload.password;
    form.is_active = payload.is_active;
    form.admin = payload.admin;

    let user = state.accounts.update_user(&form).await?;
    Ok(Json(user_view(&user)))
}

pub async fn set_password(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PasswordChange>,
) -> Result<StatusCode, ServerError> {
    let form = AdminPasswordChangeForm {
        password1: payload.password1,
        password2: payload.password2,
    };
    state.accounts.set_password(id, &form).await?;

    Ok(StatusCode::NO_CONTENT)
}
