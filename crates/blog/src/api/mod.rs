//! HTTP API module.
//!
//! Account endpoints, health check and the result envelope they share.

mod envelope;
mod error;
mod handlers;
mod routes;
mod state;

pub use envelope::ResultEnvelope;
pub use error::{ApiError, ApiResult};
pub use handlers::{CurrentAccount, TokenResponse};
pub use routes::create_router;
pub use state::AppState;
