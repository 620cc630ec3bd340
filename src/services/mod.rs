//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod auth_service;
pub mod container;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator};
pub use user_service::{UserManager, UserService};
