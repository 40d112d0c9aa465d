use axum::{
    Extension, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{ServerError, admin, settings, signup};
use accounts::{Accounts, AccountsError, User};

#[derive(Clone)]
pub struct ServerState {
    pub accounts: Arc<Accounts>,
}

/// Authenticate requests with HTTP Basic credentials (email and password).
///
/// The authenticated `User` is stored in the request extensions.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user = state
        .accounts
        .authenticate(auth_header.username(), auth_header.password())
        .await
        .map_err(|err| {
            tracing::error!("authentication error: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Reject non-admin users. Must run after `auth`.
async fn require_admin(
    Extension(user): Extension<User>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if !user.admin {
        tracing::warn!(user_id = %user.id, "admin route refused");
        return Err(AccountsError::Forbidden("admin only".to_string()).into());
    }
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let admin = Router::new()
        .route("/admin/users", get(admin::list).post(admin::create))
        .route(
            "/admin/users/{id}",
            get(admin::change_form).patch(admin::update),
        )
        .route("/admin/users/{id}/password", post(admin::set_password))
        .route_layer(middleware::from_fn(require_admin));

    let authenticated = Router::new()
        .route("/settings", get(settings::get).patch(settings::update))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/signup", get(signup::form).post(signup::sign_up))
        .route("/health", get(|| async { StatusCode::OK }))
        .merge(authenticated)
        .with_state(state)
}

pub async fn run_with_listener(
    accounts: Accounts,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        accounts: Arc::new(accounts),
    };

    axum::serve(listener, router(state)).await
}
