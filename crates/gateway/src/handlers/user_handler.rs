//! Account lifecycle handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::put,
    Router,
};

use common::AppResult;

use crate::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/activate/:token", put(activate_user))
}

/// Redeem an invitation token
#[utoipa::path(
    put,
    path = "/v1/users/activate/{token}",
    tag = "Users",
    params(("token" = String, Path, description = "Invitation token from the activation mail")),
    responses(
        (status = 204, description = "Account activated"),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn activate_user(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<StatusCode> {
    state.auth_service.activate(token).await?;
    Ok(StatusCode::NO_CONTENT)
}
