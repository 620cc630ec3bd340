//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::messages::ERROR_EMAIL_TAKEN;
use crate::domain::{User, UserPatch};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by email address (exact match)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users, oldest first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Insert a new user; `password_digest` must already be hashed
    async fn create(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password_digest: String,
    ) -> AppResult<User>;

    /// Apply a partial update and bump `updated_at`
    async fn update(&self, id: i32, patch: UserPatch) -> AppResult<User>;

    /// Permanently delete user
    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// SeaORM-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// The only unique column besides the key is `email`.
fn map_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::invalid_field("email", ERROR_EMAIL_TAKEN)
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let users = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn create(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        password_digest: String,
    ) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(email),
            password_digest: Set(password_digest),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(map_write_error)?;

        Ok(User::from(model))
    }

    async fn update(&self, id: i32, patch: UserPatch) -> AppResult<User> {
        let model = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_not_found("User")?;

        let mut active_model: ActiveModel = model.into();

        if let Some(first_name) = patch.first_name {
            active_model.first_name = Set(first_name);
        }
        if let Some(last_name) = patch.last_name {
            active_model.last_name = Set(last_name);
        }
        if let Some(email) = patch.email {
            active_model.email = Set(email);
        }
        if let Some(password_digest) = patch.password_digest {
            active_model.password_digest = Set(password_digest);
        }
        active_model.updated_at = Set(chrono::Utc::now());

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(map_write_error)?;

        Ok(User::from(updated))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("User"));
        }

        Ok(())
    }
}
