//! Registration, login and account edits.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use super::error::{AccountError, codes};
use super::requests::{LoginRequest, RegisterRequest, UpdateAccountRequest};
use crate::auth::{PasswordHasher, PasswordPolicy, TokenClaims, TokenIssuer, claims_for_user};
use crate::notify::{LogNotifier, Notifier, welcome_message};
use crate::user::{
    NewUser, RepositoryError, UpdateUser, User, UserInfo, UserRepository, slug_from_email,
};

const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a successful registration.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub email: String,
    /// One-time plaintext password. Only ever returned to the caller.
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Orchestrates account flows over explicitly injected collaborators.
#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
    hasher: PasswordHasher,
    issuer: Arc<TokenIssuer>,
    policy: PasswordPolicy,
    notifier: Option<Arc<dyn Notifier>>,
    notify_timeout: Duration,
}

impl AccountService {
    /// Create a service that logs welcome messages instead of delivering them.
    pub fn new(
        users: UserRepository,
        hasher: PasswordHasher,
        issuer: Arc<TokenIssuer>,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
            policy,
            notifier: Some(Arc::new(LogNotifier)),
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    /// Replace the notifier and its per-message timeout.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        self.notifier = Some(notifier);
        self.notify_timeout = timeout;
        self
    }

    /// Skip welcome messages entirely.
    pub fn without_notifier(mut self) -> Self {
        self.notifier = None;
        self
    }

    /// Register a new account with a generated password.
    ///
    /// The email's uniqueness is decided by the storage constraint, so two
    /// concurrent registrations for the same address yield exactly one account.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<Registration, AccountError> {
        request.validate().map_err(AccountError::Validation)?;

        let name = request.name.trim().to_string();
        let email = request.email.trim().to_string();
        let password = self.policy.generate();

        let password_hash = self
            .hasher
            .hash_blocking(password.clone())
            .await
            .map_err(|e| {
                error!("Failed to hash generated password: {}", e);
                AccountError::Internal(codes::REGISTRATION_FAILED)
            })?;

        let user = self
            .users
            .create(NewUser {
                name,
                slug: slug_from_email(&email),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateEmail => AccountError::DuplicateCredential,
                other => {
                    error!("Failed to create user: {}", other);
                    AccountError::Internal(codes::REGISTRATION_FAILED)
                }
            })?;

        info!(user_id = user.id, "Registered account");

        self.send_welcome(&user, &password).await;

        Ok(Registration {
            email: user.email,
            password,
        })
    }

    async fn send_welcome(&self, user: &User, password: &str) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let message = welcome_message(&user.name, &user.email, password);
        match tokio::time::timeout(self.notify_timeout, notifier.send(&message)).await {
            Ok(Ok(())) => debug!(user_id = user.id, "Welcome message sent"),
            Ok(Err(e)) => warn!(user_id = user.id, "Welcome message failed: {:#}", e),
            Err(_) => warn!(
                user_id = user.id,
                "Welcome message timed out after {:?}", self.notify_timeout
            ),
        }
    }

    /// Exchange credentials for a signed token.
    ///
    /// An unknown email and a wrong password produce the same error.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<String, AccountError> {
        request.validate().map_err(AccountError::Validation)?;

        let user = self
            .users
            .find_by_email_with_roles(request.email.trim())
            .await
            .map_err(|e| {
                error!("User lookup failed: {}", e);
                AccountError::Internal(codes::LOGIN_FAILED)
            })?
            .ok_or_else(|| {
                debug!("Login rejected: unknown email");
                AccountError::InvalidCredentials
            })?;

        if !self
            .hasher
            .verify_blocking(user.password_hash.clone(), request.password)
            .await
        {
            debug!(user_id = user.id, "Login rejected: password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.issuer.issue(&claims_for_user(&user)).map_err(|e| {
            error!("Failed to issue token: {}", e);
            AccountError::Internal(codes::TOKEN_ISSUE_FAILED)
        })?;

        info!(user_id = user.id, "Issued token");
        Ok(token)
    }

    /// Update name and email of an account.
    ///
    /// Allowed for the account owner and for admins.
    #[instrument(skip(self, actor, request), fields(actor = %actor.sub))]
    pub async fn update_account(
        &self,
        actor: &TokenClaims,
        id: i64,
        request: UpdateAccountRequest,
    ) -> Result<UserInfo, AccountError> {
        request.validate().map_err(AccountError::Validation)?;

        let existing = self
            .users
            .find_by_id_with_roles(id)
            .await
            .map_err(|e| {
                error!("User lookup failed: {}", e);
                AccountError::Internal(codes::ACCOUNT_UPDATE_FAILED)
            })?
            .ok_or(AccountError::NotFound)?;

        if existing.email != actor.sub && !actor.is_admin() {
            return Err(AccountError::Forbidden);
        }

        let update = UpdateUser {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
        };

        let user = self.users.update(id, update).await.map_err(|e| match e {
            RepositoryError::DuplicateEmail => AccountError::DuplicateCredential,
            RepositoryError::UserNotFound(_) => AccountError::NotFound,
            other => {
                error!("Failed to update user: {}", other);
                AccountError::Internal(codes::ACCOUNT_UPDATE_FAILED)
            }
        })?;

        info!(user_id = user.id, "Updated account");
        Ok(UserInfo::from(user))
    }
}
