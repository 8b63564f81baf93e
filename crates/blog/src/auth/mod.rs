//! Authentication module.
//!
//! Provides:
//! - bcrypt password hashing and one-time password generation
//! - HS256 JWT issuance and validation
//! - Bearer-token middleware for protected routes

mod claims;
mod config;
mod error;
mod middleware;
mod password;
mod token;

pub use claims::{ADMIN_ROLE, Claim, TokenClaims, claims_for_user};
pub use config::{AuthConfig, ConfigValidationError, PasswordPolicy};
pub use error::AuthError;
pub use middleware::{AuthState, CurrentUser, auth_middleware};
pub use password::PasswordHasher;
pub use token::TokenIssuer;
