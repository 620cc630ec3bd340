//! Server-side session storage.
//!
//! The browser only holds an opaque session id in a cookie; everything else
//! (the signed-in user, pending flash messages) lives behind `SessionStore`.
//!
//! - `RedisSessionStore`: production backend, one JSON value per session
//! - `MemorySessionStore`: single-process backend for development and tests

mod memory;
mod redis_store;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::types::Flash;

pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

/// Opaque session identifier carried by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh, unguessable id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Accept a cookie value only if it looks like an id we issued.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::try_parse(value)
            .ok()
            .map(|id| Self(id.simple().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the application keeps per browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Signed-in user, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    /// Messages waiting to be shown on the next rendered page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flash: Vec<Flash>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.flash.is_empty()
    }
}

/// Session persistence backend.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a live session; expired or unknown ids yield `None`.
    async fn load(&self, id: &SessionId) -> AppResult<Option<SessionData>>;

    /// Create or replace a session, resetting its lifetime to `ttl`.
    async fn save(&self, id: &SessionId, data: &SessionData, ttl: Duration) -> AppResult<()>;

    /// Forget a session. Unknown ids are not an error.
    async fn destroy(&self, id: &SessionId) -> AppResult<()>;

    /// Connectivity check for the health endpoint.
    async fn ping(&self) -> AppResult<()>;
}
