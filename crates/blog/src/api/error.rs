//! API errors rendered as result envelopes.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use super::envelope::ResultEnvelope;
use crate::account::{AccountError, codes};
use crate::auth::AuthError;

/// API error type. Messages are client-facing.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_messages(self) -> Vec<String> {
        match self {
            Self::Validation(errors) => errors,
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Internal(msg) => vec![msg],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), message = %self, "API error");
        } else {
            debug!(status = status.as_u16(), message = %self, "Client error");
        }

        let body: ResultEnvelope<()> = ResultEnvelope::failure(self.into_messages());
        (status, Json(body)).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(errors) => ApiError::Validation(errors),
            AccountError::DuplicateCredential => ApiError::BadRequest(format!(
                "{} - This email is already registered",
                codes::DUPLICATE_EMAIL
            )),
            AccountError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid username or password".to_string())
            }
            AccountError::NotFound => ApiError::NotFound("Account not found".to_string()),
            AccountError::Forbidden => {
                ApiError::Forbidden("You are not allowed to modify this account".to_string())
            }
            AccountError::Internal(code) => {
                ApiError::Internal(format!("{code} - Internal server failure"))
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => {
                ApiError::Unauthorized("Missing or invalid authorization".to_string())
            }
            AuthError::InvalidToken(msg) => {
                debug!("Rejected token: {}", msg);
                ApiError::Unauthorized("Invalid token".to_string())
            }
            AuthError::TokenExpired => ApiError::Unauthorized("Token has expired".to_string()),
            AuthError::Internal(msg) => {
                error!("Authentication error: {}", msg);
                ApiError::Internal("Internal server failure".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![rejection.body_text()])
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
