//! HTTP layer: handlers, middleware and route definitions
//!
//! Pages are rendered on the server; every mutation is a form post that
//! answers with a redirect or with the form re-rendered alongside its errors.

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
