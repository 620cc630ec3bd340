//! Authentication service - verifies email/password pairs for session login.

use async_trait::async_trait;
use std::sync::{Arc, OnceLock};

use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Return the user owning these credentials or `InvalidCredentials`.
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User>;
}

/// Digest verified against when the email is unknown, so both failure
/// paths cost one Argon2 verification.
fn dummy_password() -> &'static Password {
    static DUMMY: OnceLock<Password> = OnceLock::new();
    DUMMY.get_or_init(|| {
        Password::new("dummy-password-never-matches")
            .unwrap_or_else(|_| Password::from_hash(String::new()))
    })
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self.users.find_by_email(email.trim()).await?;

        match user {
            Some(user) if Password::from_hash(user.password_digest.clone()).verify(password) => {
                tracing::info!(user_id = user.id, "User signed in");
                Ok(user)
            }
            Some(user) => {
                tracing::debug!(user_id = user.id, "Password mismatch");
                Err(AppError::InvalidCredentials)
            }
            None => {
                dummy_password().verify(password);
                Err(AppError::InvalidCredentials)
            }
        }
    }
}
