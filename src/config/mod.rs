//! Application configuration module
//!
//! Handles environment variables, application-wide constants and UI copy.

mod constants;
pub mod messages;
mod settings;

pub use constants::*;
pub use settings::{Config, SessionBackend};
