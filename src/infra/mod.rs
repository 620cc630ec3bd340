//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Session storage (Redis or in-memory)

pub mod db;
pub mod repositories;
pub mod sessions;

pub use db::{Database, Migrator};
pub use repositories::{UserRepository, UserStore};
pub use sessions::{MemorySessionStore, RedisSessionStore, SessionData, SessionId, SessionStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
