//! Service layer - onboarding and authentication workflows.

mod activation;
mod auth_service;
mod registration;
mod session;

pub use activation::Activator;
pub use auth_service::{AuthService, Authenticator};
pub use registration::{normalize_email, RegisteredAccount, Registrar, Registration};
pub use session::{Claims, SessionIssuer, TokenResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
