//! Application state for dependency injection.

use std::sync::Arc;

use account_service_lib::AccountRepository;
use auth_service_lib::AuthService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub accounts: Arc<dyn AccountRepository>,
}

impl AppState {
    /// Create new app state.
    pub fn new(auth_service: Arc<dyn AuthService>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self {
            auth_service,
            accounts,
        }
    }
}
