//! HTTP API tests.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; the
//! account store is the in-memory implementation and mail goes nowhere.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use account_service_lib::repository::{MemoryStore, MockAccountRepository};
use account_service_lib::AccountRepository;
use auth_service_lib::config::AuthServiceConfig;
use auth_service_lib::mailer::NoopMailer;
use auth_service_lib::service::{AuthService, Authenticator, MockAuthService};
use common::{AppError, JwtConfig};
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;

// =============================================================================
// Test Helpers
// =============================================================================

fn config() -> AuthServiceConfig {
    AuthServiceConfig {
        jwt: JwtConfig {
            secret: "test-secret-key-for-testing-only-32chars".to_string(),
            ..JwtConfig::default()
        },
        ..AuthServiceConfig::default()
    }
}

fn app_with(config: AuthServiceConfig) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let accounts: Arc<dyn AccountRepository> = store.clone();
    let auth_service: Arc<dyn AuthService> =
        Arc::new(Authenticator::new(accounts.clone(), Arc::new(NoopMailer), &config).unwrap());

    (create_router(AppState::new(auth_service, accounts)), store)
}

fn app() -> (Router, Arc<MemoryStore>) {
    app_with(config())
}

fn mocked(auth_service: MockAuthService) -> Router {
    create_router(AppState::new(
        Arc::new(auth_service),
        Arc::new(MemoryStore::new()),
    ))
}

fn registration() -> Value {
    json!({
        "first_name": "Ann",
        "last_name": "Lee",
        "country": "New Zealand",
        "email": "ann@example.com",
        "password": "Str0ng!Pass",
        "password_confirmation": "Str0ng!Pass"
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

// =============================================================================
// Onboarding Flow
// =============================================================================

#[tokio::test]
async fn test_register_activate_login() {
    let (app, store) = app();

    let (status, body) = send(&app, Method::POST, "/v1/authentication/user", Some(registration())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ann@example.com");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["role"], "user");
    assert!(body["username"].as_str().unwrap().starts_with("annlee"));
    assert!(body.get("password_hash").is_none());
    assert_eq!(store.account_count(), 1);

    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/authentication/token",
        Some(json!({ "email": "ann@example.com", "password": "Str0ng!Pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::PUT, &format!("/v1/users/activate/{token}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/token",
        Some(json!({ "email": "ann@example.com", "password": "Str0ng!Pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn test_second_activation_is_invalid_token() {
    let (app, _) = app();
    let (_, body) = send(&app, Method::POST, "/v1/authentication/user", Some(registration())).await;
    let uri = format!("/v1/users/activate/{}", body["token"].as_str().unwrap());

    let (status, _) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    assert_eq!(body["error"]["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_unknown_token_is_invalid_token() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::PUT, "/v1/users/activate/deadbeef", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let (app, store) = app();
    send(&app, Method::POST, "/v1/authentication/user", Some(registration())).await;

    let mut again = registration();
    again["email"] = json!("ANN@example.com");
    let (status, body) = send(&app, Method::POST, "/v1/authentication/user", Some(again)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_EMAIL");
    assert_eq!(store.account_count(), 1);
}

#[tokio::test]
async fn test_empty_username_gets_generated_handle() {
    let (app, _) = app();
    let mut body = registration();
    body["username"] = json!("");

    let (status, body) = send(&app, Method::POST, "/v1/authentication/user", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let username = body["username"].as_str().unwrap();
    assert!(username.starts_with("annlee"));
    assert_eq!(username.len(), "annlee".len() + 6);
}

#[tokio::test]
async fn test_token_hidden_when_exposure_disabled() {
    let (app, _) = app_with(AuthServiceConfig {
        expose_activation_token: false,
        ..config()
    });

    let (status, body) = send(&app, Method::POST, "/v1/authentication/user", Some(registration())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_login_failures_look_alike() {
    let (app, _) = app();

    let (status, unknown) = send(
        &app,
        Method::POST,
        "/v1/authentication/token",
        Some(json!({ "email": "nobody@example.com", "password": "Str0ng!Pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["error"]["code"], "INVALID_CREDENTIALS");

    send(&app, Method::POST, "/v1/authentication/user", Some(registration())).await;
    let (status, wrong) = send(
        &app,
        Method::POST,
        "/v1/authentication/token",
        Some(json!({ "email": "ann@example.com", "password": "Wr0ng!Pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
}

// =============================================================================
// Request Validation
// =============================================================================

#[tokio::test]
async fn test_password_confirmation_mismatch() {
    let (app, store) = app();
    let mut body = registration();
    body["password_confirmation"] = json!("Other!Pass1");

    let (status, body) = send(&app, Method::POST, "/v1/authentication/user", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(store.account_count(), 0);
}

#[tokio::test]
async fn test_weak_password_rejected_by_policy() {
    let (app, store) = app();
    let mut body = registration();
    body["password"] = json!("lowercase1!");
    body["password_confirmation"] = json!("lowercase1!");

    let (status, body) = send(&app, Method::POST, "/v1/authentication/user", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("password"));
    assert_eq!(store.account_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/authentication/user")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// =============================================================================
// Error Mapping
// =============================================================================

#[tokio::test]
async fn test_mail_failure_is_generic_internal_error() {
    let mut auth = MockAuthService::new();
    auth.expect_register()
        .returning(|_| Err(AppError::mail("connection refused by smtp.example.com")));
    let app = mocked(auth);

    let (status, body) = send(&app, Method::POST, "/v1/authentication/user", Some(registration())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert!(!body.to_string().contains("smtp.example.com"));
}

#[tokio::test]
async fn test_username_exhaustion_is_conflict() {
    let mut auth = MockAuthService::new();
    auth.expect_register()
        .times(1)
        .returning(|_| Err(AppError::DuplicateUsername));
    let app = mocked(auth);

    let (status, body) = send(&app, Method::POST, "/v1/authentication/user", Some(registration())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "DUPLICATE_USERNAME");
}

#[tokio::test]
async fn test_invalid_request_never_reaches_service() {
    let mut auth = MockAuthService::new();
    auth.expect_register().never();
    let app = mocked(auth);

    let mut body = registration();
    body["email"] = json!("not-an-email");
    let (status, _) = send(&app, Method::POST, "/v1/authentication/user", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_healthy() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_degraded_when_database_down() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_ping()
        .returning(|| Err(AppError::internal("connection reset")));
    let app = create_router(AppState::new(
        Arc::new(MockAuthService::new()),
        Arc::new(accounts),
    ));

    let (status, body) = send(&app, Method::GET, "/v1/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/v1/authentication/user").is_some());
    assert!(body["paths"].get("/v1/users/activate/{token}").is_some());
}
