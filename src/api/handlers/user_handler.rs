//! User registration and profile handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Extension, Form, Router,
};
use serde::Deserialize;

use super::page_context;
use crate::api::middleware::{CurrentUser, Session};
use crate::api::AppState;
use crate::config::messages::{
    FLASH_USERS_CREATE_ERROR, FLASH_USERS_CREATE_SUCCESS, FLASH_USERS_DELETE_ERROR,
    FLASH_USERS_DELETE_SUCCESS, FLASH_USERS_NOT_ALLOWED, FLASH_USERS_UPDATE_ERROR,
    FLASH_USERS_UPDATE_SUCCESS,
};
use crate::config::{METHOD_OVERRIDE_FIELD, ROUTE_ROOT, ROUTE_USERS};
use crate::domain::{NewUser, UserChanges};
use crate::errors::{AppError, AppResult};
use crate::types::{FieldErrors, Found, HtmlPage};
use crate::views::{EditUserPage, NewUserPage, UserFormView, UserRow, UsersIndexPage};

/// Registration and profile form payload (`data[...]` field names)
#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    #[serde(rename = "_method")]
    pub method: Option<String>,
    #[serde(rename = "data[firstName]")]
    pub first_name: Option<String>,
    #[serde(rename = "data[lastName]")]
    pub last_name: Option<String>,
    #[serde(rename = "data[email]")]
    pub email: Option<String>,
    #[serde(rename = "data[password]")]
    pub password: Option<String>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl UserForm {
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            first_name: trimmed(self.first_name).unwrap_or_default(),
            last_name: trimmed(self.last_name).unwrap_or_default(),
            email: trimmed(self.email).unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        }
    }

    /// Only the submitted inputs become changes; passwords are not trimmed.
    pub fn into_changes(self) -> UserChanges {
        UserChanges {
            first_name: trimmed(self.first_name),
            last_name: trimmed(self.last_name),
            email: trimmed(self.email),
            password: self.password,
        }
    }
}

/// Public user routes, mounted at `/users`
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/new", get(new))
}

/// User routes that require a signed-in user, mounted at `/users`
pub fn protected_user_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/edit", get(edit))
        .route("/:id", patch(update).delete(destroy).post(dispatch))
}

/// Ownership failures bounce back to the list; a missing user stays a 404.
async fn reject(session: &Session, err: AppError) -> AppResult<Response> {
    match err {
        AppError::Forbidden => {
            session.error(FLASH_USERS_NOT_ALLOWED).await;
            Ok(Found::to(ROUTE_USERS).into_response())
        }
        e => Err(e),
    }
}

/// List all users
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<HtmlPage<UsersIndexPage>> {
    let page = page_context(&state, &session).await?;
    let rows = state
        .user_service
        .list_users()
        .await?
        .iter()
        .map(|user| UserRow::new(user, page.current_user_id))
        .collect();

    Ok(HtmlPage(UsersIndexPage { page, rows }))
}

/// Registration form
pub async fn new(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<HtmlPage<NewUserPage>> {
    let page = page_context(&state, &session).await?;
    Ok(HtmlPage(NewUserPage {
        page,
        form: UserFormView::registration("", "", "", FieldErrors::default()),
    }))
}

/// Register a new user
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    let new_user = form.into_new_user();

    let errors = match state.user_service.register(new_user.clone()).await {
        Ok(_) => {
            session.info(FLASH_USERS_CREATE_SUCCESS).await;
            return Ok(Found::to(ROUTE_ROOT).into_response());
        }
        Err(AppError::Validation(errors)) => {
            tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Registration rejected");
            errors
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to register user");
            FieldErrors::default()
        }
    };

    session.error(FLASH_USERS_CREATE_ERROR).await;
    let page = page_context(&state, &session).await?;
    let form = UserFormView::registration(
        &new_user.first_name,
        &new_user.last_name,
        &new_user.email,
        errors,
    );
    Ok(HtmlPage(NewUserPage { page, form }).into_response())
}

/// Profile form, owner only
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let user = match state.user_service.authorize_edit(current_user.id, id).await {
        Ok(user) => user,
        Err(e) => return reject(&session, e).await,
    };

    let page = page_context(&state, &session).await?;
    Ok(HtmlPage(EditUserPage {
        page,
        form: UserFormView::edit(&user),
    })
    .into_response())
}

/// Apply profile changes, owner only
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    update_user(state, session, current_user, id, form).await
}

/// Delete a profile, owner only. The owner is signed out afterwards.
pub async fn destroy(
    State(state): State<AppState>,
    session: Session,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    delete_user(state, session, current_user, id).await
}

/// `POST /users/:id` carrying `_method=patch|delete` from an HTML form
pub async fn dispatch(
    State(state): State<AppState>,
    session: Session,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Form(form): Form<UserForm>,
) -> AppResult<Response> {
    let method = form.method.as_deref().unwrap_or_default().to_ascii_lowercase();

    match method.as_str() {
        "patch" | "put" => update_user(state, session, current_user, id, form).await,
        "delete" => delete_user(state, session, current_user, id).await,
        other => Err(AppError::BadRequest(format!(
            "Unsupported {} value: {:?}",
            METHOD_OVERRIDE_FIELD, other
        ))),
    }
}

async fn update_user(
    state: AppState,
    session: Session,
    current_user: CurrentUser,
    id: i32,
    form: UserForm,
) -> AppResult<Response> {
    let changes = form.into_changes();

    let errors = match state
        .user_service
        .update_user(current_user.id, id, changes.clone())
        .await
    {
        Ok(_) => {
            session.info(FLASH_USERS_UPDATE_SUCCESS).await;
            return Ok(Found::to(ROUTE_USERS).into_response());
        }
        Err(AppError::Validation(errors)) => errors,
        Err(e @ (AppError::Forbidden | AppError::NotFound(_))) => return reject(&session, e).await,
        Err(e) => {
            tracing::error!(error = %e, user_id = id, "Failed to update user");
            FieldErrors::default()
        }
    };

    session.error(FLASH_USERS_UPDATE_ERROR).await;
    let user = state.user_service.get_user(id).await?;
    let page = page_context(&state, &session).await?;
    Ok(HtmlPage(EditUserPage {
        page,
        form: UserFormView::edit_with_errors(&user, &changes, errors),
    })
    .into_response())
}

async fn delete_user(
    state: AppState,
    session: Session,
    current_user: CurrentUser,
    id: i32,
) -> AppResult<Response> {
    match state.user_service.delete_user(current_user.id, id).await {
        Ok(()) => {
            session.sign_out().await;
            session.info(FLASH_USERS_DELETE_SUCCESS).await;
            Ok(Found::to(ROUTE_ROOT).into_response())
        }
        Err(e @ (AppError::Forbidden | AppError::NotFound(_))) => reject(&session, e).await,
        Err(e) => {
            tracing::error!(error = %e, user_id = id, "Failed to delete user");
            session.error(FLASH_USERS_DELETE_ERROR).await;
            Ok(Found::to(ROUTE_USERS).into_response())
        }
    }
}
