//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use auth_service_lib::{Registration, TokenResponse};
use common::{AppError, AppResult};
use domain::AccountResponse;

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    #[schema(example = "Ann")]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    #[schema(example = "Lee")]
    pub last_name: String,
    #[validate(length(min = 1, max = 100, message = "Country is required"))]
    #[schema(example = "New Zealand")]
    pub country: String,
    /// Account email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email is too long")
    )]
    #[schema(example = "ann@example.com", max_length = 255)]
    pub email: String,
    /// Password (8 to 72 characters, mixed case, digit and symbol)
    #[validate(length(min = 8, max = 72, message = "Password must be between 8 and 72 characters"))]
    #[schema(example = "Str0ng!Pass", min_length = 8, max_length = 72)]
    pub password: String,
    /// Must equal `password`
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    #[schema(example = "Str0ng!Pass")]
    pub password_confirmation: String,
    /// Preferred username; one is generated when absent, blank or taken
    #[validate(length(max = 100, message = "Username must be at most 100 characters"))]
    #[schema(example = "annlee")]
    pub username: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            first_name: req.first_name,
            last_name: req.last_name,
            country: req.country,
            email: req.email,
            password: req.password,
            password_confirmation: req.password_confirmation,
            username: req.username.filter(|u| !u.trim().is_empty()),
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ann@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Str0ng!Pass")]
    pub password: String,
}

/// Registration response: the new account plus, outside production, its
/// activation token.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    /// Plaintext activation token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(register))
        .route("/token", post(login))
}

/// Register a new account
///
/// The workflow runs on its own task so a client disconnect cannot cut it
/// short between account creation and a compensating delete.
#[utoipa::path(
    post,
    path = "/v1/authentication/user",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, invitation sent", body = RegisterResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email or username already taken"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let auth_service = state.auth_service.clone();
    let registration = Registration::from(payload);

    let registered = tokio::spawn(async move { auth_service.register(registration).await })
        .await
        .map_err(|e| AppError::internal(format!("registration task failed: {e}")))??;

    let response = RegisterResponse {
        account: AccountResponse::from(registered.account),
        token: registered.activation_token,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange credentials for a session token
#[utoipa::path(
    post,
    path = "/v1/authentication/token",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Session token issued", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            country: "NZ".to_string(),
            email: "ann@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            password_confirmation: "Str0ng!Pass".to_string(),
            username: None,
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_register_request_confirmation_mismatch() {
        let req = RegisterRequest {
            password_confirmation: "Other!Pass1".to_string(),
            ..request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_username_counts_as_absent() {
        let req = RegisterRequest {
            username: Some(String::new()),
            ..request()
        };
        assert!(req.validate().is_ok());
        assert_eq!(Registration::from(req).username, None);
    }

    #[test]
    fn test_long_username_rejected() {
        let req = RegisterRequest {
            username: Some("x".repeat(101)),
            ..request()
        };
        assert!(req.validate().is_err());
    }
}
