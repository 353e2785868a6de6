//! API Gateway Library
//!
//! HTTP surface of the onboarding workflows: registration, invitation
//! redemption, login and a health probe, served with axum and documented
//! with OpenAPI.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use account_service_lib::AccountRepository;
use auth_service_lib::AuthService;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Connect the account store, build the auth service and serve HTTP.
pub async fn run_server(
    host: &str,
    port: u16,
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let accounts: Arc<dyn AccountRepository> =
        Arc::new(account_service_lib::connect_store(&config.accounts).await?);
    let auth_service: Arc<dyn AuthService> =
        Arc::new(auth_service_lib::build(accounts.clone(), &config.auth)?);

    info!(
        environment = ?config.auth.environment,
        smtp = config.auth.smtp.is_some(),
        expose_activation_token = config.auth.expose_activation_token,
        "Auth service ready"
    );

    let state = AppState::new(auth_service, accounts);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
