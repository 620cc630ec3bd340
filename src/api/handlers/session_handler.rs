//! Login and logout.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use super::page_context;
use crate::api::middleware::Session;
use crate::api::AppState;
use crate::config::messages::{
    FLASH_SESSION_CREATE_ERROR, FLASH_SESSION_CREATE_SUCCESS, FLASH_SESSION_DELETE_SUCCESS,
};
use crate::config::ROUTE_ROOT;
use crate::errors::{AppError, AppResult};
use crate::types::{Found, HtmlPage};
use crate::views::{NewSessionPage, SessionFormView};

/// Login form payload
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    /// HTML forms can only POST; `delete` here means logout
    #[serde(rename = "_method")]
    pub method: Option<String>,
    #[serde(rename = "data[email]", default)]
    pub email: String,
    #[serde(rename = "data[password]", default)]
    pub password: String,
}

impl LoginForm {
    fn is_logout(&self) -> bool {
        self.method
            .as_deref()
            .is_some_and(|method| method.eq_ignore_ascii_case("delete"))
    }
}

/// Create session routes, mounted at `/session`
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/new", get(new))
        .route("/", post(create).delete(destroy))
}

/// Login form
pub async fn new(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<HtmlPage<NewSessionPage>> {
    let page = page_context(&state, &session).await?;
    Ok(HtmlPage(NewSessionPage {
        page,
        form: SessionFormView::new(""),
    }))
}

/// Sign in, or sign out when the form tunnels `DELETE`
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if form.is_logout() {
        return Ok(log_out(&session).await);
    }

    match state
        .auth_service
        .authenticate(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            session.sign_in(user.id).await;
            session.info(FLASH_SESSION_CREATE_SUCCESS).await;
            Ok(Found::to(ROUTE_ROOT).into_response())
        }
        Err(AppError::InvalidCredentials) => {
            tracing::debug!(email = %form.email.trim(), "Rejected login");
            session.error(FLASH_SESSION_CREATE_ERROR).await;
            let page = page_context(&state, &session).await?;
            Ok(HtmlPage(NewSessionPage {
                page,
                form: SessionFormView::new(form.email.trim()),
            })
            .into_response())
        }
        Err(e) => Err(e),
    }
}

/// Sign out
pub async fn destroy(session: Session) -> Response {
    log_out(&session).await
}

async fn log_out(session: &Session) -> Response {
    session.sign_out().await;
    session.info(FLASH_SESSION_DELETE_SUCCESS).await;
    Found::to(ROUTE_ROOT).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::header, http::Request};

    async fn parse(body: &'static str) -> LoginForm {
        let request = Request::post("/session")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        let Form(form) = Form::<LoginForm>::from_request(request, &()).await.unwrap();
        form
    }

    #[tokio::test]
    async fn test_login_form_field_names() {
        let form = parse("data%5Bemail%5D=ada%40example.com&data%5Bpassword%5D=secret").await;
        assert_eq!(form.email, "ada@example.com");
        assert_eq!(form.password, "secret");
        assert!(!form.is_logout());
    }

    #[tokio::test]
    async fn test_method_override_means_logout() {
        let form = parse("_method=DELETE").await;
        assert!(form.is_logout());
        assert!(form.email.is_empty());
    }
}
