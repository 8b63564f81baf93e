//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted JWT secret length in bytes (HS256 key size).
const MIN_SECRET_LEN: usize = 32;

/// Secret shipped in example configs; never accepted.
const INSECURE_DEFAULT_SECRET: &str = "change-me-in-production";

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Longest accepted token lifetime (one year).
pub(crate) const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT secret for HS256. Supports `env:VAR_NAME` indirection.
    /// REQUIRED: the server refuses to start without it.
    pub jwt_secret: Option<String>,

    /// Token lifetime in seconds.
    pub token_ttl_secs: u64,

    /// bcrypt cost factor.
    pub bcrypt_cost: u32,

    /// Policy for passwords generated at registration.
    pub password: PasswordPolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // No default JWT secret - must be explicitly configured
            jwt_secret: None,
            token_ttl_secs: 8 * 60 * 60,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            password: PasswordPolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Resolve the JWT secret, expanding `env:VAR_NAME` syntax.
    /// Returns the resolved secret or None if not configured.
    pub fn resolve_jwt_secret(&self) -> Result<Option<String>, ConfigValidationError> {
        match &self.jwt_secret {
            None => Ok(None),
            Some(value) => {
                if let Some(var_name) = value.strip_prefix("env:") {
                    match std::env::var(var_name) {
                        Ok(secret) if !secret.is_empty() => Ok(Some(secret)),
                        Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
                        Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
                    }
                } else {
                    Ok(Some(value.clone()))
                }
            }
        }
    }

    /// Token lifetime.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let secret = self
            .resolve_jwt_secret()?
            .ok_or(ConfigValidationError::MissingJwtSecret)?;
        validate_secret(&secret)?;

        validate_token_ttl(self.token_ttl_secs)?;

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigValidationError::InvalidBcryptCost(self.bcrypt_cost));
        }

        self.password.validate()
    }

    /// Generate a secure random JWT secret using cryptographically secure RNG.
    pub fn generate_jwt_secret() -> String {
        use rand::Rng;

        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        const SECRET_LENGTH: usize = 64;

        let mut rng = rand::rng();
        (0..SECRET_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }
}

/// Check a resolved signing secret.
pub(crate) fn validate_secret(secret: &str) -> Result<(), ConfigValidationError> {
    if secret.is_empty() {
        return Err(ConfigValidationError::MissingJwtSecret);
    }
    if secret == INSECURE_DEFAULT_SECRET {
        return Err(ConfigValidationError::InsecureJwtSecret);
    }
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigValidationError::JwtSecretTooShort);
    }
    Ok(())
}

/// Check a token lifetime in seconds.
pub(crate) fn validate_token_ttl(ttl_secs: u64) -> Result<(), ConfigValidationError> {
    if ttl_secs == 0 {
        return Err(ConfigValidationError::InvalidTokenTtl);
    }
    if ttl_secs > MAX_TOKEN_TTL_SECS {
        return Err(ConfigValidationError::TokenTtlTooLong(ttl_secs));
    }
    Ok(())
}

/// Policy for generated one-time passwords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    /// Number of characters.
    pub length: usize,
    /// Include special characters.
    pub include_special: bool,
    /// Include uppercase letters.
    pub upper_case: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: 25,
            include_special: true,
            upper_case: false,
        }
    }
}

impl PasswordPolicy {
    /// bcrypt only looks at the first 72 bytes.
    const MAX_LENGTH: usize = 72;
    const MIN_LENGTH: usize = 8;

    /// Validate the policy.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&self.length) {
            return Err(ConfigValidationError::InvalidPasswordLength(self.length));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    /// JWT secret is required.
    #[error(
        "JWT secret is required. Set BLOG__AUTH__JWT_SECRET or auth.jwt_secret in config."
    )]
    MissingJwtSecret,

    /// JWT secret is the insecure example value.
    #[error("JWT secret cannot be the example value. Please configure a secure secret.")]
    InsecureJwtSecret,

    /// JWT secret is too short.
    #[error("JWT secret must be at least 32 characters long.")]
    JwtSecretTooShort,

    /// Environment variable not found (for `env:VAR_NAME` syntax).
    #[error("Environment variable '{0}' not found (referenced via env:{0} in config).")]
    EnvVarNotFound(String),

    /// Environment variable is empty (for `env:VAR_NAME` syntax).
    #[error("Environment variable '{0}' is empty (referenced via env:{0} in config).")]
    EnvVarEmpty(String),

    /// Token lifetime must be positive.
    #[error("auth.token_ttl_secs must be greater than zero.")]
    InvalidTokenTtl,

    /// Token lifetime above the supported maximum.
    #[error("auth.token_ttl_secs must be at most 31536000 (one year), got {0}.")]
    TokenTtlTooLong(u64),

    /// bcrypt cost outside the supported range.
    #[error("auth.bcrypt_cost must be between 4 and 31, got {0}.")]
    InvalidBcryptCost(u32),

    /// Generated password length outside the supported range.
    #[error("auth.password.length must be between 8 and 72, got {0}.")]
    InvalidPasswordLength(usize),
}
