//! Response helpers shared by the HTML handlers.

use askama::Template;
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::errors::AppError;

/// `302 Found` redirect, the status browsers and form posts expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found(pub String);

impl Found {
    pub fn to(location: impl Into<String>) -> Self {
        Self(location.into())
    }
}

impl IntoResponse for Found {
    fn into_response(self) -> Response {
        (StatusCode::FOUND, [(header::LOCATION, self.0)]).into_response()
    }
}

/// Renders an Askama template as a `200 OK` HTML page.
pub struct HtmlPage<T>(pub T);

impl<T> IntoResponse for HtmlPage<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => AppError::from(err).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_sets_location() {
        let response = Found::to("/users").into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/users");
    }
}
