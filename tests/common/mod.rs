//! Shared harness for router-level tests.
//!
//! Every `TestApp` owns a fresh SQLite database in a temporary directory and
//! an in-memory session store, and behaves like a single browser: the session
//! cookie issued by one response is sent with the next request.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use axum_extra::extract::cookie::Cookie;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use task_manager::api::{create_router, AppState};
use task_manager::config::{Config, SessionBackend};
use task_manager::domain::User;
use task_manager::infra::{Database, MemorySessionStore, UserRepository, UserStore};

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::FOUND, "body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(to));
    }
}

pub struct TestApp {
    router: Router,
    pub database: Arc<Database>,
    pub sessions: Arc<MemorySessionStore>,
    cookie: Option<String>,
    _dir: Option<TempDir>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display()),
            session_backend: SessionBackend::Memory,
            ..Config::default()
        };

        let database = Arc::new(Database::connect(&config).await.unwrap());
        let sessions = Arc::new(MemorySessionStore::new());
        let state = AppState::from_config(database.clone(), sessions.clone(), config);

        Self {
            _dir: Some(dir),
            ..Self::with_state(state, database, sessions)
        }
    }

    /// Wrap a prepared state, e.g. one built around stub services
    pub fn with_state(
        state: AppState,
        database: Arc<Database>,
        sessions: Arc<MemorySessionStore>,
    ) -> Self {
        Self {
            router: create_router(state),
            database,
            sessions,
            cookie: None,
            _dir: None,
        }
    }

    /// Session cookie currently held by this "browser"
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Drop the session cookie, like a fresh browser
    pub fn forget_cookie(&mut self) {
        self.cookie = None;
    }

    pub fn set_cookie(&mut self, cookie: &str) {
        self.cookie = Some(cookie.to_string());
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, uri, Some(serde_urlencoded::to_string(form).unwrap())).await
    }

    pub async fn patch(&mut self, uri: &str, form: &[(&str, &str)]) -> TestResponse {
        self.send(Method::PATCH, uri, Some(serde_urlencoded::to_string(form).unwrap())).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    pub async fn send(&mut self, method: Method, uri: &str, form: Option<String>) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match form {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body)),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let cookie = Cookie::parse(set_cookie.to_str().unwrap().to_string()).unwrap();
            // An empty value is how the server removes the cookie
            self.cookie = (!cookie.value().is_empty())
                .then(|| format!("{}={}", cookie.name(), cookie.value()));
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn register(&mut self, first_name: &str, last_name: &str, email: &str, password: &str) -> TestResponse {
        self.post(
            "/users",
            &[
                ("data[firstName]", first_name),
                ("data[lastName]", last_name),
                ("data[email]", email),
                ("data[password]", password),
            ],
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post(
            "/session",
            &[("data[email]", email), ("data[password]", password)],
        )
        .await
    }

    /// Register and sign in; returns the stored user
    pub async fn signed_in_user(&mut self, first_name: &str, email: &str) -> User {
        self.register(first_name, "Tester", email, "secret").await;
        self.login(email, "secret").await.assert_redirect("/");
        self.user_by_email(email).await.unwrap()
    }

    pub async fn user_by_email(&self, email: &str) -> Option<User> {
        UserStore::new(self.database.get_connection())
            .find_by_email(email)
            .await
            .unwrap()
    }

    pub async fn user_by_id(&self, id: i32) -> Option<User> {
        UserStore::new(self.database.get_connection())
            .find_by_id(id)
            .await
            .unwrap()
    }
}
