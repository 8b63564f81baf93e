//! Account flows: registration, login and account edits.

mod error;
mod requests;
mod service;

pub use error::{AccountError, codes};
pub use requests::{LoginRequest, RegisterRequest, UpdateAccountRequest, is_valid_email};
pub use service::{AccountService, Registration};
