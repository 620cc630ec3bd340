//! Session authentication middleware.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::Session;
use crate::api::AppState;
use crate::config::messages::FLASH_AUTH_ERROR;
use crate::config::ROUTE_NEW_SESSION;
use crate::domain::User;
use crate::types::Found;

/// Authenticated user resolved from the session
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser {
    pub id: i32,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self { id: user.id }
    }
}

/// Session authentication middleware.
///
/// Resolves the session's user id to an existing user and injects
/// `CurrentUser` into the request extensions. Anonymous requests, and
/// sessions whose user no longer exists, are redirected to the login form
/// with an error flash.
pub async fn auth_middleware(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match session.user_id().await {
        Some(id) => match state.user_service.find_user(id).await {
            Ok(user) => user,
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    match user {
        Some(user) => {
            request.extensions_mut().insert(CurrentUser::from(&user));
            next.run(request).await
        }
        None => {
            tracing::debug!(path = %request.uri().path(), "Unauthenticated request");
            session.sign_out().await;
            session.error(FLASH_AUTH_ERROR).await;
            Found::to(ROUTE_NEW_SESSION).into_response()
        }
    }
}
