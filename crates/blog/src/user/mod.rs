//! User accounts and role assignments.

mod models;
mod repository;

pub use models::{NewUser, Role, UpdateUser, User, UserInfo, slug_from_email};
pub use repository::{RepositoryError, UserRepository};
