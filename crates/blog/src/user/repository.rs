//! User repository for database operations.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, instrument};

use super::models::{NewUser, Role, UpdateUser, User, UserRow};

/// Repository failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The email is already taken (unique constraint).
    #[error("email already registered")]
    DuplicateEmail,

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("role not found: {0}")]
    RoleNotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Map a write error, turning unique-constraint violations into `DuplicateEmail`.
    fn from_write(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Self::DuplicateEmail,
            other => Self::Database(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Repository for user and role records.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user. Duplicate emails are rejected by the `UNIQUE` constraint.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create(&self, user: NewUser) -> Result<User> {
        debug!("Creating user: {}", user.email);

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, slug, password_hash)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.slug)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        let id = result.last_insert_rowid();
        self.find_by_id_with_roles(id)
            .await?
            .ok_or_else(|| RepositoryError::UserNotFound(id.to_string()))
    }

    /// Get a user with roles by ID.
    #[instrument(skip(self))]
    pub async fn find_by_id_with_roles(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, slug, password_hash, image, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        self.attach_roles(row).await
    }

    /// Get a user with roles by email.
    #[instrument(skip(self))]
    pub async fn find_by_email_with_roles(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, slug, password_hash, image, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        self.attach_roles(row).await
    }

    async fn attach_roles(&self, row: Option<UserRow>) -> Result<Option<User>> {
        match row {
            Some(row) => {
                let roles = self.roles_for(row.id).await?;
                Ok(Some(row.with_roles(roles)))
            }
            None => Ok(None),
        }
    }

    /// Roles assigned to a user, in attachment order.
    pub async fn roles_for(&self, user_id: i64) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name, r.slug
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = ?
            ORDER BY ur.rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    /// Update name and email. The slug is left untouched.
    #[instrument(skip(self, update), fields(email = %update.email))]
    pub async fn update(&self, id: i64, update: UpdateUser) -> Result<User> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::UserNotFound(id.to_string()));
        }

        self.find_by_id_with_roles(id)
            .await?
            .ok_or_else(|| RepositoryError::UserNotFound(id.to_string()))
    }

    async fn find_role(&self, slug: &str) -> Result<Role> {
        sqlx::query_as::<_, Role>("SELECT id, name, slug FROM roles WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::RoleNotFound(slug.to_string()))
    }

    async fn user_id_for(&self, email: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::UserNotFound(email.to_string()))
    }

    /// Attach a role to a user. Already-held roles keep their position.
    #[instrument(skip(self))]
    pub async fn assign_role(&self, email: &str, role_slug: &str) -> Result<User> {
        let user_id = self.user_id_for(email).await?;
        let role = self.find_role(role_slug).await?;

        sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role.id)
            .execute(&self.pool)
            .await?;

        self.find_by_id_with_roles(user_id)
            .await?
            .ok_or_else(|| RepositoryError::UserNotFound(email.to_string()))
    }

    /// Detach a role from a user. Returns whether anything was removed.
    #[instrument(skip(self))]
    pub async fn revoke_role(&self, email: &str, role_slug: &str) -> Result<bool> {
        let user_id = self.user_id_for(email).await?;
        let role = self.find_role(role_slug).await?;

        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = ? AND role_id = ?")
            .bind(user_id)
            .bind(role.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All known roles.
    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name, slug FROM roles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::user::slug_from_email;

    async fn setup_repo() -> UserRepository {
        let db = Database::in_memory().await.unwrap();
        UserRepository::new(db.pool().clone())
    }

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            slug: slug_from_email(email),
            password_hash: "$2b$04$placeholderhash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = setup_repo().await;

        let user = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.slug, "ana-x-com");
        assert!(user.roles.is_empty());

        let by_email = repo
            .find_by_email_with_roles("ana@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = repo.find_by_id_with_roles(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ana@x.com");

        assert!(
            repo.find_by_email_with_roles("nobody@x.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = setup_repo().await;
        repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

        let err = repo
            .create(new_user("Other Ana", "ana@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_colliding_slugs_allowed() {
        let repo = setup_repo().await;
        let first = repo.create(new_user("A", "a.b@c.com")).await.unwrap();
        let second = repo.create(new_user("B", "a@b.c.com")).await.unwrap();
        assert_eq!(first.slug, second.slug);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_roles_in_attachment_order() {
        let repo = setup_repo().await;
        repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

        repo.assign_role("ana@x.com", "editor").await.unwrap();
        repo.assign_role("ana@x.com", "admin").await.unwrap();
        let user = repo.assign_role("ana@x.com", "editor").await.unwrap();

        let slugs: Vec<&str> = user.roles.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["editor", "admin"]);
    }

    #[tokio::test]
    async fn test_revoke_role() {
        let repo = setup_repo().await;
        repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
        repo.assign_role("ana@x.com", "author").await.unwrap();

        assert!(repo.revoke_role("ana@x.com", "author").await.unwrap());
        assert!(!repo.revoke_role("ana@x.com", "author").await.unwrap());

        let user = repo
            .find_by_email_with_roles("ana@x.com")
            .await
            .unwrap()
            .unwrap();
        assert!(user.roles.is_empty());
    }

    #[tokio::test]
    async fn test_assign_unknown_role_or_user() {
        let repo = setup_repo().await;
        repo.create(new_user("Ana", "ana@x.com")).await.unwrap();

        assert!(matches!(
            repo.assign_role("ana@x.com", "owner").await.unwrap_err(),
            RepositoryError::RoleNotFound(_)
        ));
        assert!(matches!(
            repo.assign_role("ghost@x.com", "admin").await.unwrap_err(),
            RepositoryError::UserNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_update_user() {
        let repo = setup_repo().await;
        let user = repo.create(new_user("Ana", "ana@x.com")).await.unwrap();
        repo.create(new_user("Bob", "bob@x.com")).await.unwrap();

        let updated = repo
            .update(
                user.id,
                UpdateUser {
                    name: "Ana Maria".to_string(),
                    email: "ana.maria@x.com".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.email, "ana.maria@x.com");
        assert_eq!(updated.slug, "ana-x-com");

        let err = repo
            .update(
                user.id,
                UpdateUser {
                    name: "Ana".to_string(),
                    email: "bob@x.com".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateEmail));

        let err = repo
            .update(
                9999,
                UpdateUser {
                    name: "Ghost".to_string(),
                    email: "ghost@x.com".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_roles() {
        let repo = setup_repo().await;
        let roles = repo.list_roles().await.unwrap();
        let slugs: Vec<&str> = roles.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["admin", "author", "editor"]);
    }
}
