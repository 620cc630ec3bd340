//! Task manager - server-rendered user accounts and session login
//!
//! Users register, sign in with email and password, and may edit or delete
//! only their own profile. Pages are rendered with Askama; state lives in a
//! SeaORM-managed database and a Redis (or in-memory) session store.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration, constants and UI strings
//! - **domain**: Core entities and password hashing
//! - **services**: Use cases: registration, profile edits, authentication
//! - **infra**: Database, repositories and session stores
//! - **api**: HTTP handlers, middleware, and routes
//! - **views**: Page templates and view models
//! - **types**: Shared types (flash messages, field errors, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;
pub mod views;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User};
pub use errors::{AppError, AppResult};
