//! JWT issuance and validation.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use tracing::debug;

use super::config::{validate_secret, validate_token_ttl};
use super::{AuthConfig, AuthError, Claim, ConfigValidationError, TokenClaims};

/// Signs and checks HS256 tokens with a single symmetric key.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer from a raw secret.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, ConfigValidationError> {
        validate_secret(secret)?;
        validate_token_ttl(ttl.as_secs())?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// Create an issuer from auth config, resolving `env:VAR_NAME` secrets.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigValidationError> {
        let secret = config
            .resolve_jwt_secret()?
            .ok_or(ConfigValidationError::MissingJwtSecret)?;
        Self::new(&secret, config.token_ttl())
    }

    /// Sign a token for the given claim set.
    pub fn issue(&self, claims: &[Claim]) -> Result<String, AuthError> {
        let ttl_secs = i64::try_from(self.ttl.as_secs())
            .map_err(|_| AuthError::Internal("token lifetime out of range".to_string()))?;
        let payload = TokenClaims::from_claims(claims, Utc::now().timestamp(), ttl_secs)
            .ok_or_else(|| {
                AuthError::Internal("claim set has no identity claim or expiry overflows".to_string())
            })?;

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Validate a token and return its payload.
    pub fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                debug!("JWT validation failed: {:?}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
