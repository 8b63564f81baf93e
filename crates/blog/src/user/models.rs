//! User data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role entity from database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Raw `users` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub slug: String,
    pub password_hash: String,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRow {
    pub(crate) fn with_roles(self, roles: Vec<Role>) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            slug: self.slug,
            password_hash: self.password_hash,
            image: self.image,
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User with its role set, in attachment order.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub slug: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub image: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: String,
    pub updated_at: String,
}

/// Public user info (safe to return to clients).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub slug: String,
    pub image: Option<String>,
    pub roles: Vec<String>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            slug: user.slug,
            image: user.image,
            roles: user.roles.into_iter().map(|role| role.slug).collect(),
        }
    }
}

/// Fields for a new user. Only ever holds the hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub slug: String,
    pub password_hash: String,
}

/// Editable account fields.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
}

/// Derive the URL slug for an account from its email.
///
/// Lossy: `a.b@c.com` and `a@b.c.com` map to the same slug.
pub fn slug_from_email(email: &str) -> String {
    email.replace(['@', '.'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_email() {
        assert_eq!(slug_from_email("ana@x.com"), "ana-x-com");
        assert_eq!(slug_from_email("first.last@mail.example.org"), "first-last-mail-example-org");
        assert_eq!(slug_from_email("plain"), "plain");
    }

    #[test]
    fn test_slug_collisions_are_possible() {
        assert_eq!(slug_from_email("a.b@c.com"), slug_from_email("a@b.c.com"));
    }

    #[test]
    fn test_user_info_from_user() {
        let user = User {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            slug: "ana-x-com".to_string(),
            password_hash: "secret".to_string(),
            image: None,
            roles: vec![Role {
                id: 3,
                name: "Editor".to_string(),
                slug: "editor".to_string(),
            }],
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));

        let info = UserInfo::from(user);
        assert_eq!(info.id, 7);
        assert_eq!(info.roles, vec!["editor"]);
    }
}
