//! User service - registration, listing and owner-only profile management.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::config::messages::ERROR_EMAIL_TAKEN;
use crate::domain::{NewUser, Password, User, UserChanges, UserPatch};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;
use crate::types::FieldErrors;

/// User service trait for dependency injection.
///
/// Mutating operations take the id of the acting (signed-in) user and
/// enforce that it owns the target record. Lookup happens before the
/// ownership check, so a missing record is always `NotFound`.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Get user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Get user by ID, `None` if missing
    async fn find_user(&self, id: i32) -> AppResult<Option<User>>;

    /// Register a new user
    async fn register(&self, new_user: NewUser) -> AppResult<User>;

    /// Load a user the actor is allowed to edit
    async fn authorize_edit(&self, actor_id: i32, id: i32) -> AppResult<User>;

    /// Patch the actor's own record
    async fn update_user(&self, actor_id: i32, id: i32, changes: UserChanges) -> AppResult<User>;

    /// Delete the actor's own record
    async fn delete_user(&self, actor_id: i32, id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Flag `email` if it belongs to someone other than `owner_id`.
    async fn check_email_available(
        &self,
        email: &str,
        owner_id: Option<i32>,
        errors: &mut FieldErrors,
    ) -> AppResult<()> {
        if errors.has("email") {
            return Ok(());
        }

        if let Some(existing) = self.users.find_by_email(email).await? {
            if Some(existing.id) != owner_id {
                errors.add("email", ERROR_EMAIL_TAKEN);
            }
        }

        Ok(())
    }
}

fn validation_errors<T: Validate>(value: &T) -> FieldErrors {
    match value.validate() {
        Ok(()) => FieldErrors::default(),
        Err(e) => FieldErrors::from(e),
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn find_user(&self, id: i32) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn register(&self, new_user: NewUser) -> AppResult<User> {
        let mut errors = validation_errors(&new_user);
        self.check_email_available(&new_user.email, None, &mut errors)
            .await?;

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let password_digest = Password::new(&new_user.password)?.into_string();
        let user = self
            .users
            .create(
                new_user.first_name,
                new_user.last_name,
                new_user.email,
                password_digest,
            )
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    async fn authorize_edit(&self, actor_id: i32, id: i32) -> AppResult<User> {
        let user = self.get_user(id).await?;

        if !user.is_owned_by(actor_id) {
            tracing::warn!(actor_id, target_id = id, "Rejected edit of another user");
            return Err(AppError::Forbidden);
        }

        Ok(user)
    }

    async fn update_user(&self, actor_id: i32, id: i32, changes: UserChanges) -> AppResult<User> {
        let user = self.authorize_edit(actor_id, id).await?;
        let changes = changes.without_blank_password();

        let mut errors = validation_errors(&changes);
        if let Some(email) = changes.email.as_deref() {
            if email != user.email {
                self.check_email_available(email, Some(user.id), &mut errors)
                    .await?;
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let password_digest = changes
            .password
            .as_deref()
            .map(|plain| Password::new(plain).map(Password::into_string))
            .transpose()?;

        let patch = UserPatch {
            first_name: changes.first_name,
            last_name: changes.last_name,
            email: changes.email,
            password_digest,
        };

        let updated = self.users.update(id, patch).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }

    async fn delete_user(&self, actor_id: i32, id: i32) -> AppResult<()> {
        self.authorize_edit(actor_id, id).await?;
        self.users.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn create_test_user(id: i32) -> User {
        User {
            id,
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("user{}@example.com", id),
            password_digest: "hashed".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    fn service(repo: MockUserRepository) -> UserManager {
        UserManager::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(9))
            .returning(|_| Ok(None));

        let result = service(repo).get_user(9).await;
        assert!(matches!(result, Err(AppError::NotFound("User"))));
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|first, last, email, digest| {
                first == "Test"
                    && last == "User"
                    && email == "new@example.com"
                    && digest != "password123"
                    && Password::from_hash(digest.clone()).verify("password123")
            })
            .returning(|first_name, last_name, email, password_digest| {
                Ok(User {
                    first_name,
                    last_name,
                    email,
                    password_digest,
                    ..create_test_user(1)
                })
            });

        let user = service(repo)
            .register(new_user("new@example.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("user1@example.com"))
            .returning(|_| Ok(Some(create_test_user(1))));
        repo.expect_create().never();

        let result = service(repo).register(new_user("user1@example.com")).await;
        match result {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.messages("email"), [ERROR_EMAIL_TAKEN.to_string()]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_reports_all_invalid_fields() {
        let mut repo = MockUserRepository::new();
        // Invalid email is not looked up
        repo.expect_find_by_email().never();
        repo.expect_create().never();

        let result = service(repo)
            .register(NewUser {
                first_name: String::new(),
                last_name: String::new(),
                email: "nope".to_string(),
                password: "x".to_string(),
            })
            .await;

        match result {
            Err(AppError::Validation(errors)) => {
                let fields: Vec<_> = errors.fields().collect();
                assert_eq!(fields, vec!["email", "first_name", "last_name", "password"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_authorize_edit_checks_existence_before_ownership() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo).authorize_edit(1, 2).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_authorize_edit_forbids_other_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));

        let result = service(repo).authorize_edit(1, 2).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_update_own_profile() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));
        repo.expect_update()
            .withf(|id, patch| {
                *id == 3
                    && patch.first_name.as_deref() == Some("UpdatedName")
                    && patch.last_name.is_none()
                    && patch.password_digest.is_none()
            })
            .returning(|id, patch| {
                Ok(User {
                    first_name: patch.first_name.unwrap_or_default(),
                    ..create_test_user(id)
                })
            });

        let changes = UserChanges {
            first_name: Some("UpdatedName".to_string()),
            password: Some(String::new()),
            ..Default::default()
        };
        let user = service(repo).update_user(3, 3, changes).await.unwrap();
        assert_eq!(user.first_name, "UpdatedName");
    }

    #[tokio::test]
    async fn test_update_other_user_is_forbidden() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));
        repo.expect_update().never();

        let changes = UserChanges {
            first_name: Some("Hack".to_string()),
            ..Default::default()
        };
        let result = service(repo).update_user(1, 2, changes).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_first_name() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));
        repo.expect_update().never();

        let changes = UserChanges {
            first_name: Some(String::new()),
            ..Default::default()
        };
        match service(repo).update_user(1, 1, changes).await {
            Err(AppError::Validation(errors)) => assert!(errors.has("first_name")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_another_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));
        repo.expect_find_by_email()
            .with(eq("user2@example.com"))
            .returning(|_| Ok(Some(create_test_user(2))));
        repo.expect_update().never();

        let changes = UserChanges {
            email: Some("user2@example.com".to_string()),
            ..Default::default()
        };
        match service(repo).update_user(1, 1, changes).await {
            Err(AppError::Validation(errors)) => assert!(errors.has("email")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_new_password_is_hashed() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));
        repo.expect_update()
            .withf(|id, patch| {
                let hashed = patch
                    .password_digest
                    .as_ref()
                    .is_some_and(|digest| Password::from_hash(digest.clone()).verify("new-secret"));
                *id == 1 && hashed
            })
            .returning(|id, _| Ok(create_test_user(id)));

        let changes = UserChanges {
            password: Some("new-secret".to_string()),
            ..Default::default()
        };
        assert!(service(repo).update_user(1, 1, changes).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_own_profile() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));
        repo.expect_delete().with(eq(4)).times(1).returning(|_| Ok(()));

        assert!(service(repo).delete_user(4, 4).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_other_user_is_forbidden() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));
        repo.expect_delete().never();

        let result = service(repo).delete_user(4, 5).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
