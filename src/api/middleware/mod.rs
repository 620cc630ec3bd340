//! API middleware.

mod auth;
mod session;

pub use auth::{auth_middleware, CurrentUser};
pub use session::{session_middleware, Session};
