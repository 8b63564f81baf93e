//! API request handlers.

mod accounts;
mod health;

pub use accounts::{CurrentAccount, TokenResponse, current_account, login, register, update_account};
pub use health::health;
