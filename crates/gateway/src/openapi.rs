//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::auth_handler::{LoginRequest, RegisterRequest, RegisterResponse};
use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use auth_service_lib::TokenResponse;
use domain::AccountResponse;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::user_handler::activate_user,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            TokenResponse,
            AccountResponse,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    tags(
        (name = "Authentication", description = "Registration and login endpoints"),
        (name = "Users", description = "Account activation endpoints"),
        (name = "Health", description = "Liveness and dependency checks"),
    )
)]
pub struct ApiDoc;
