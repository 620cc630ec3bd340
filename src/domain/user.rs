//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::config::MIN_PASSWORD_LENGTH;

/// User domain entity
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// "First Last", as shown in the users table
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Ownership rule: a user record belongs to the user with the same id.
    pub fn is_owned_by(&self, actor_id: i32) -> bool {
        self.id == actor_id
    }
}

/// Registration data, password in plain text
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 3 characters"))]
    pub password: String,
}

/// Partial update. `None` leaves the column untouched; present values are
/// held to the same rules as registration.
#[derive(Debug, Clone, Default, Validate)]
pub struct UserChanges {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 3 characters"))]
    pub password: Option<String>,
}

impl UserChanges {
    /// An empty password in an edit form means "keep the current one".
    pub fn without_blank_password(mut self) -> Self {
        if self.password.as_deref().is_some_and(str::is_empty) {
            self.password = None;
        }
        self
    }
}

/// Persistence-level patch: like `UserChanges` but with the password
/// already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_digest: Option<String>,
}
