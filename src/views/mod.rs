//! Page templates and the view models they render.
//!
//! Templates live in `templates/` at the crate root and are compiled in by
//! Askama. View models carry display-ready strings so the templates stay free
//! of formatting logic.

mod forms;

use askama::Template;

use crate::config::messages::APP_NAME;
use crate::config::{edit_user_path, user_path};
use crate::domain::User;
use crate::types::Flash;

pub use forms::{FormField, SessionFormView, UserFormView};

/// Layout data every page needs: navigation state and pending flash.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub current_user_id: Option<i32>,
    pub current_user_name: Option<String>,
    pub flash: Vec<Flash>,
}

impl PageContext {
    pub fn new(current_user: Option<&User>, flash: Vec<Flash>) -> Self {
        Self {
            current_user_id: current_user.map(|user| user.id),
            current_user_name: current_user.map(User::full_name),
            flash,
        }
    }

    pub fn app_name(&self) -> &'static str {
        APP_NAME
    }

    pub fn signed_in(&self) -> bool {
        self.current_user_id.is_some()
    }

    pub fn user_name(&self) -> &str {
        self.current_user_name.as_deref().unwrap_or_default()
    }
}

/// One line of the users table
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub created_at: String,
    pub edit_path: String,
    pub user_path: String,
    /// Edit/delete controls are only offered on the viewer's own row
    pub editable: bool,
}

impl UserRow {
    pub fn new(user: &User, viewer_id: Option<i32>) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name(),
            email: user.email.clone(),
            created_at: user.created_at.format("%d.%m.%Y, %H:%M:%S").to_string(),
            edit_path: edit_user_path(user.id),
            user_path: user_path(user.id),
            editable: viewer_id.is_some_and(|id| user.is_owned_by(id)),
        }
    }
}

#[derive(Template)]
#[template(path = "welcome/index.html")]
pub struct WelcomePage {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexPage {
    pub page: PageContext,
    pub rows: Vec<UserRow>,
}

#[derive(Template)]
#[template(path = "users/new.html")]
pub struct NewUserPage {
    pub page: PageContext,
    pub form: UserFormView,
}

#[derive(Template)]
#[template(path = "users/edit.html")]
pub struct EditUserPage {
    pub page: PageContext,
    pub form: UserFormView,
}

#[derive(Template)]
#[template(path = "session/new.html")]
pub struct NewSessionPage {
    pub page: PageContext,
    pub form: SessionFormView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldErrors;
    use chrono::Utc;

    fn user(id: i32) -> User {
        User {
            id,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_digest: "digest".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_editable_only_for_viewer() {
        let ada = user(1);
        assert!(UserRow::new(&ada, Some(1)).editable);
        assert!(!UserRow::new(&ada, Some(2)).editable);
        assert!(!UserRow::new(&ada, None).editable);
        assert_eq!(UserRow::new(&ada, None).edit_path, "/users/1/edit");
    }

    #[test]
    fn test_layout_shows_flash_and_sign_out_when_signed_in() {
        let ada = user(1);
        let page = WelcomePage {
            page: PageContext::new(Some(&ada), vec![Flash::info("You are logged in")]),
        };
        let html = page.render().unwrap();

        assert!(html.contains("You are logged in"));
        assert!(html.contains("alert-info"));
        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains(r#"value="delete""#));
        assert!(!html.contains(r#"href="/session/new""#));
    }

    #[test]
    fn test_users_index_offers_controls_on_own_row_only() {
        let ada = user(1);
        let grace = User {
            id: 2,
            first_name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            ..user(2)
        };
        let page = UsersIndexPage {
            rows: vec![UserRow::new(&ada, Some(1)), UserRow::new(&grace, Some(1))],
            page: PageContext::new(Some(&ada), Vec::new()),
        };
        let html = page.render().unwrap();

        assert!(html.contains(r#"href="/users/1/edit""#));
        assert!(!html.contains(r#"href="/users/2/edit""#));
        assert!(html.contains("grace@example.com"));
    }

    #[test]
    fn test_new_user_form_escapes_values_and_shows_errors() {
        let mut errors = FieldErrors::default();
        errors.add("first_name", "First name is required");
        let page = NewUserPage {
            page: PageContext::default(),
            form: UserFormView::registration("", "<b>Doe</b>", "doe@example.com", errors),
        };
        let html = page.render().unwrap();

        assert!(html.contains(r#"name="data[firstName]""#));
        assert!(html.contains("is-invalid"));
        assert!(html.contains("invalid-feedback"));
        assert!(html.contains("First name is required"));
        assert!(!html.contains("<b>Doe</b>"));
    }

    #[test]
    fn test_edit_form_tunnels_patch() {
        let ada = user(1);
        let page = EditUserPage {
            page: PageContext::new(Some(&ada), Vec::new()),
            form: UserFormView::edit(&ada),
        };
        let html = page.render().unwrap();

        assert!(html.contains(r#"action="/users/1""#));
        assert!(html.contains(r#"name="_method" value="patch""#));
        assert!(html.contains(r#"value="Ada""#));
        assert!(!html.contains("invalid-feedback"));
    }
}
