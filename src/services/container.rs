//! Service Container - Centralized service access.

use std::sync::Arc;

use super::{AuthService, Authenticator, UserManager, UserService};
use crate::infra::{UserRepository, UserStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create a new service container from already built services
    pub fn new(auth_service: Arc<dyn AuthService>, user_service: Arc<dyn UserService>) -> Self {
        Self {
            auth_service,
            user_service,
        }
    }

    /// Build every service on top of one repository
    pub fn from_repository(users: Arc<dyn UserRepository>) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(users.clone())),
            user_service: Arc::new(UserManager::new(users)),
        }
    }

    /// Create service container from database connection
    pub fn from_connection(db: sea_orm::DatabaseConnection) -> Self {
        Self::from_repository(Arc::new(UserStore::new(db)))
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
