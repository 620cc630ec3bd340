//! Cookie-backed server-side sessions.
//!
//! `session_middleware` resolves the session cookie into a `Session` handle
//! for the handlers, then writes the session back once the response is built:
//! only modified sessions are stored, and a cookie is only issued when the
//! session id changed.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tokio::sync::Mutex;

use crate::api::AppState;
use crate::config::Config;
use crate::errors::AppError;
use crate::infra::{SessionData, SessionId};
use crate::types::Flash;

struct SessionState {
    id: SessionId,
    data: SessionData,
    /// Id the browser presented, if it resolved to a stored session
    loaded_id: Option<SessionId>,
    dirty: bool,
}

/// Per-request handle to the current session.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    fn new(id: SessionId, data: SessionData, loaded: bool) -> Self {
        let loaded_id = loaded.then(|| id.clone());
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                id,
                data,
                loaded_id,
                dirty: false,
            })),
        }
    }

    /// Fresh, empty session (not yet stored)
    pub fn empty() -> Self {
        Self::new(SessionId::generate(), SessionData::default(), false)
    }

    /// Signed-in user id
    pub async fn user_id(&self) -> Option<i32> {
        self.inner.lock().await.data.user_id
    }

    /// Mark `user_id` as signed in. The session id is rotated so an id
    /// handed out before login cannot be reused afterwards.
    pub async fn sign_in(&self, user_id: i32) {
        let mut state = self.inner.lock().await;
        state.data.user_id = Some(user_id);
        state.id = SessionId::generate();
        state.dirty = true;
    }

    /// Forget the signed-in user; pending flash messages survive.
    pub async fn sign_out(&self) {
        let mut state = self.inner.lock().await;
        if state.data.user_id.take().is_some() {
            state.dirty = true;
        }
    }

    /// Queue a message for the next rendered page
    pub async fn flash(&self, flash: Flash) {
        let mut state = self.inner.lock().await;
        state.data.flash.push(flash);
        state.dirty = true;
    }

    pub async fn info(&self, message: &str) {
        self.flash(Flash::info(message)).await;
    }

    pub async fn error(&self, message: &str) {
        self.flash(Flash::error(message)).await;
    }

    /// Drain queued messages; each one is shown exactly once.
    pub async fn take_flash(&self) -> Vec<Flash> {
        let mut state = self.inner.lock().await;
        if state.data.flash.is_empty() {
            return Vec::new();
        }
        state.dirty = true;
        std::mem::take(&mut state.data.flash)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::internal("Session middleware is not installed"))
    }
}

fn session_cookie(config: &Config, id: &SessionId) -> Cookie<'static> {
    Cookie::build((config.session_cookie_name.clone(), id.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.session_ttl().as_secs() as i64))
        .build()
}

/// Load the session before the handler runs and persist it afterwards.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let presented = jar
        .get(&state.config.session_cookie_name)
        .and_then(|cookie| SessionId::parse(cookie.value()));

    let stored = match &presented {
        Some(id) => match state.sessions.load(id).await {
            Ok(data) => data.map(|data| (id.clone(), data)),
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    let session = match stored {
        Some((id, data)) => Session::new(id, data, true),
        None => Session::empty(),
    };

    request.extensions_mut().insert(session.clone());
    let response = next.run(request).await;

    let session = session.inner.lock().await;
    if !session.dirty {
        return response;
    }

    let ttl = state.config.session_ttl();

    if let Some(old_id) = session.loaded_id.as_ref().filter(|old| **old != session.id) {
        if let Err(e) = state.sessions.destroy(old_id).await {
            tracing::error!(error = %e, "Failed to destroy rotated session");
        }
    }

    if session.data.is_empty() {
        if let Err(e) = state.sessions.destroy(&session.id).await {
            tracing::error!(error = %e, "Failed to destroy empty session");
        }
        if presented.is_some() {
            let removal = Cookie::build((state.config.session_cookie_name.clone(), ""))
                .path("/")
                .build();
            return (jar.remove(removal), response).into_response();
        }
        return response;
    }

    if let Err(e) = state.sessions.save(&session.id, &session.data, ttl).await {
        tracing::error!(error = %e, "Failed to persist session");
        return e.into_response();
    }

    if presented.as_ref() != Some(&session.id) {
        return (jar.add(session_cookie(&state.config, &session.id)), response).into_response();
    }

    response
}
