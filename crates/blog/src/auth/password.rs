//! Password hashing and one-time password generation.

use rand::Rng;
use tracing::warn;

use super::{AuthError, PasswordPolicy};

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*()_-+=";

/// bcrypt-backed credential hasher.
///
/// Every call to [`PasswordHasher::hash`] draws a fresh salt, which bcrypt
/// embeds in its output; [`PasswordHasher::verify`] reads it back from there.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AuthError::Internal(format!("failed to hash password: {e}")))
    }

    /// Check a candidate against a stored hash.
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, stored_hash: &str, candidate: &str) -> bool {
        match bcrypt::verify(candidate, stored_hash) {
            Ok(matches) => matches,
            Err(e) => {
                warn!("stored password hash could not be checked: {}", e);
                false
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Internal(format!("hash task failed: {e}")))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(&self, stored_hash: String, candidate: String) -> bool {
        let hasher = *self;
        match tokio::task::spawn_blocking(move || hasher.verify(&stored_hash, &candidate)).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("verify task failed: {}", e);
                false
            }
        }
    }
}

impl PasswordPolicy {
    fn charset(&self) -> Vec<u8> {
        let mut charset = Vec::with_capacity(
            LOWERCASE.len() + DIGITS.len() + SPECIAL.len() + UPPERCASE.len(),
        );
        charset.extend_from_slice(LOWERCASE);
        charset.extend_from_slice(DIGITS);
        if self.include_special {
            charset.extend_from_slice(SPECIAL);
        }
        if self.upper_case {
            charset.extend_from_slice(UPPERCASE);
        }
        charset
    }

    /// Generate a random password that satisfies this policy.
    pub fn generate(&self) -> String {
        let charset = self.charset();
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| charset[rng.random_range(0..charset.len())] as char)
            .collect()
    }
}
