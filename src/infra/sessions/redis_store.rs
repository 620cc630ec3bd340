//! Redis-backed session store.

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use super::{SessionData, SessionId, SessionStore};
use crate::config::{Config, CACHE_PREFIX_SESSION};
use crate::errors::{AppError, AppResult};

/// Sessions stored as JSON strings under `session:<id>` with a Redis TTL.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: ConnectionManager,
}

impl RedisSessionStore {
    /// Connect to Redis using `REDIS_URL`.
    pub async fn connect(config: &Config) -> Result<Self, RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis session store connected");

        Ok(Self { connection })
    }

    fn key(id: &SessionId) -> String {
        format!("{}{}", CACHE_PREFIX_SESSION, id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &SessionId) -> AppResult<Option<SessionData>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(Self::key(id)).await.map_err(redis_error)?;

        match value {
            Some(json) => match serde_json::from_str(&json) {
                Ok(data) => Ok(Some(data)),
                Err(e) => {
                    // Treat unreadable payloads (e.g. older format) as a fresh session
                    tracing::warn!(error = %e, "Discarding undecodable session");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn save(&self, id: &SessionId, data: &SessionData, ttl: Duration) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(data)
            .map_err(|e| AppError::session(format!("Session serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(Self::key(id), json, ttl.as_secs().max(1))
            .await
            .map_err(redis_error)?;

        Ok(())
    }

    async fn destroy(&self, id: &SessionId) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(Self::key(id)).await.map_err(redis_error)?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;
        Ok(())
    }
}

fn redis_error(e: RedisError) -> AppError {
    AppError::session(format!("Redis error: {}", e))
}
