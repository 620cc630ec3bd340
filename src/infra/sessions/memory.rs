//! In-process session store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SessionData, SessionId, SessionStore};
use crate::errors::AppResult;

struct Entry {
    data: SessionData,
    expires_at: Instant,
}

/// Sessions kept in a map; lost on restart and not shared between processes.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> AppResult<Option<SessionData>> {
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.data.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it
        self.sessions.write().await.remove(id);
        Ok(None)
    }

    async fn save(&self, id: &SessionId, data: &SessionData, ttl: Duration) -> AppResult<()> {
        let now = Instant::now();
        let entry = Entry {
            data: data.clone(),
            expires_at: now + ttl,
        };
        let mut sessions = self.sessions.write().await;
        // Sweep expired entries
        sessions.retain(|_, entry| entry.expires_at > now);
        sessions.insert(id.clone(), entry);
        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> AppResult<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
