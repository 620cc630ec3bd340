//! Application settings loaded from environment variables.

use std::env;
use std::time::Duration;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SESSION_COOKIE_NAME, DEFAULT_SESSION_TTL_HOURS, SECONDS_PER_HOUR,
    SESSION_STORE_MEMORY, SESSION_STORE_REDIS,
};

/// Where session data is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Redis,
    Memory,
}

impl SessionBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            SESSION_STORE_REDIS => Some(Self::Redis),
            SESSION_STORE_MEMORY => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub session_backend: SessionBackend,
    pub session_ttl_hours: u64,
    pub session_cookie_name: String,
    pub cookie_secure: bool,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("session_backend", &self.session_backend)
            .field("session_ttl_hours", &self.session_ttl_hours)
            .field("session_cookie_name", &self.session_cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            session_backend: SessionBackend::Redis,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            cookie_secure: false,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unknown or malformed values fall back to the defaults with a warning.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let session_backend = match env::var("SESSION_STORE") {
            Ok(value) => SessionBackend::parse(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "Unknown SESSION_STORE, using redis");
                SessionBackend::Redis
            }),
            Err(_) => defaults.session_backend,
        };

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            session_backend,
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|hours| *hours > 0)
                .unwrap_or(defaults.session_ttl_hours),
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .ok()
                .filter(|name| !name.is_empty())
                .unwrap_or(defaults.session_cookie_name),
            cookie_secure: env::var("COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cookie_secure),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Session lifetime, used both for the store TTL and the cookie Max-Age.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_hours * SECONDS_PER_HOUR)
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_backend_parse() {
        assert_eq!(SessionBackend::parse("redis"), Some(SessionBackend::Redis));
        assert_eq!(SessionBackend::parse(" Memory "), Some(SessionBackend::Memory));
        assert_eq!(SessionBackend::parse("postgres"), None);
    }

    #[test]
    fn test_session_ttl_in_seconds() {
        let config = Config {
            session_ttl_hours: 2,
            ..Config::default()
        };
        assert_eq!(config.session_ttl(), Duration::from_secs(7200));
    }

    #[test]
    fn test_debug_redacts_urls() {
        let output = format!("{:?}", Config::default());
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("postgres://"));
    }
}
