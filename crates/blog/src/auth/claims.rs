//! Token claims and the user-to-claims mapping.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Role slug that grants administrative access.
pub const ADMIN_ROLE: &str = "admin";

/// A single assertion about the authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// Identity of the principal (the user's email).
    Name(String),
    /// Role membership, carried as the role slug.
    Role(String),
}

impl Claim {
    /// The claim value.
    pub fn value(&self) -> &str {
        match self {
            Claim::Name(value) | Claim::Role(value) => value,
        }
    }
}

/// Build the claim set for a user.
///
/// The identity claim comes first, followed by one role claim per assigned
/// role in the order the roles were attached. Role slugs are used rather than
/// display names since authorization checks match on slugs.
pub fn claims_for_user(user: &User) -> Vec<Claim> {
    let mut claims = Vec::with_capacity(user.roles.len() + 1);
    claims.push(Claim::Name(user.email.clone()));
    claims.extend(user.roles.iter().map(|role| Claim::Role(role.slug.clone())));
    claims
}

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user email).
    pub sub: String,

    /// Expiration time (as Unix timestamp).
    pub exp: i64,

    /// Issued at (as Unix timestamp).
    pub iat: i64,

    /// Role slugs.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl TokenClaims {
    /// Assemble a payload from a claim set.
    ///
    /// Returns `None` when the set carries no identity claim or the expiry
    /// does not fit in a timestamp.
    pub fn from_claims(claims: &[Claim], issued_at: i64, ttl_secs: i64) -> Option<Self> {
        let sub = claims.iter().find_map(|claim| match claim {
            Claim::Name(name) => Some(name.clone()),
            Claim::Role(_) => None,
        })?;

        let roles = claims
            .iter()
            .filter_map(|claim| match claim {
                Claim::Role(slug) => Some(slug.clone()),
                Claim::Name(_) => None,
            })
            .collect();

        let exp = issued_at.checked_add(ttl_secs)?;

        Some(Self {
            sub,
            exp,
            iat: issued_at,
            roles,
        })
    }

    /// Check whether the token carries a role slug.
    pub fn has_role(&self, slug: &str) -> bool {
        self.roles.iter().any(|role| role.eq_ignore_ascii_case(slug))
    }

    /// Check if the user has the admin role.
    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}
