//! Application state shared across handlers.

use std::sync::Arc;

use crate::account::AccountService;
use crate::auth::AuthState;

/// Application state. Everything inside is immutable once built.
#[derive(Clone)]
pub struct AppState {
    /// Account flows.
    pub accounts: Arc<AccountService>,
    /// Token validation for protected routes.
    pub auth: AuthState,
    /// CORS origins.
    pub allowed_origins: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(accounts: AccountService, auth: AuthState, allowed_origins: Vec<String>) -> Self {
        Self {
            accounts: Arc::new(accounts),
            auth,
            allowed_origins: Arc::new(allowed_origins),
        }
    }
}
