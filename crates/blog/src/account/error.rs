//! Account operation errors.

use thiserror::Error;

/// Diagnostic codes surfaced with internal failures.
pub mod codes {
    /// Email already registered.
    pub const DUPLICATE_EMAIL: &str = "05XE15";
    /// Registration failed for any other reason.
    pub const REGISTRATION_FAILED: &str = "05XE16";
    /// Token could not be issued.
    pub const TOKEN_ISSUE_FAILED: &str = "05XE17";
    /// Login failed on a storage or hashing fault.
    pub const LOGIN_FAILED: &str = "05XE18";
    /// Account update failed.
    pub const ACCOUNT_UPDATE_FAILED: &str = "05XE24";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("email already registered")]
    DuplicateCredential,

    /// Unknown email and wrong password both land here.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("account not found")]
    NotFound,

    #[error("not allowed to modify this account")]
    Forbidden,

    /// Carries the diagnostic code only.
    #[error("internal failure ({0})")]
    Internal(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            AccountError::Validation(vec!["a".into(), "b".into()]).to_string(),
            "validation failed: a, b"
        );
        assert_eq!(
            AccountError::Internal(codes::LOGIN_FAILED).to_string(),
            "internal failure (05XE18)"
        );
    }
}
