//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, SessionStore};
use crate::services::{AuthService, ServiceContainer, Services, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Session persistence
    pub sessions: Arc<dyn SessionStore>,
    /// Database connection
    pub database: Arc<Database>,
    /// Cookie and session settings
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(
        database: Arc<Database>,
        sessions: Arc<dyn SessionStore>,
        config: Config,
    ) -> Self {
        let services = Services::from_connection(database.get_connection());
        Self::with_services(&services, sessions, database, config)
    }

    /// Create application state around an existing service container.
    pub fn with_services(
        services: &dyn ServiceContainer,
        sessions: Arc<dyn SessionStore>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            sessions,
            database,
            config: Arc::new(config),
        }
    }
}
