//! Form view models: field values, input names and validation messages.

use crate::config::{user_path, ROUTE_SESSION, ROUTE_USERS};
use crate::domain::{User, UserChanges};
use crate::types::FieldErrors;

/// A single labelled input
#[derive(Debug, Clone)]
pub struct FormField {
    /// Input name as posted, e.g. `data[firstName]`
    pub name: &'static str,
    /// DOM id, also used by the label
    pub id: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub value: String,
    pub errors: Vec<String>,
}

impl FormField {
    fn new(
        key: &'static str,
        name: &'static str,
        label: &'static str,
        input_type: &'static str,
        value: &str,
        errors: &FieldErrors,
    ) -> Self {
        Self {
            name,
            id: key,
            label,
            input_type,
            value: value.to_string(),
            errors: errors.messages(key).to_vec(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Registration and profile forms share one layout
#[derive(Debug, Clone)]
pub struct UserFormView {
    pub action: String,
    /// Value of the hidden `_method` field, if the form tunnels a verb
    pub method_override: Option<&'static str>,
    pub submit_label: &'static str,
    pub fields: Vec<FormField>,
}

impl UserFormView {
    fn build(
        action: String,
        method_override: Option<&'static str>,
        submit_label: &'static str,
        values: [&str; 3],
        errors: &FieldErrors,
    ) -> Self {
        let [first_name, last_name, email] = values;
        Self {
            action,
            method_override,
            submit_label,
            fields: vec![
                FormField::new("first_name", "data[firstName]", "First name", "text", first_name, errors),
                FormField::new("last_name", "data[lastName]", "Last name", "text", last_name, errors),
                FormField::new("email", "data[email]", "Email", "email", email, errors),
                // Never echo a password back
                FormField::new("password", "data[password]", "Password", "password", "", errors),
            ],
        }
    }

    pub fn method_value(&self) -> &str {
        self.method_override.unwrap_or_default()
    }

    /// Registration form, optionally refilled after a failed submit
    pub fn registration(first_name: &str, last_name: &str, email: &str, errors: FieldErrors) -> Self {
        Self::build(
            ROUTE_USERS.to_string(),
            None,
            "Register",
            [first_name, last_name, email],
            &errors,
        )
    }

    /// Profile form prefilled from the stored record
    pub fn edit(user: &User) -> Self {
        Self::edit_with_errors(user, &UserChanges::default(), FieldErrors::default())
    }

    /// Profile form after a failed update: submitted values win over stored ones
    pub fn edit_with_errors(user: &User, submitted: &UserChanges, errors: FieldErrors) -> Self {
        Self::build(
            user_path(user.id),
            Some("patch"),
            "Change",
            [
                submitted.first_name.as_deref().unwrap_or(user.first_name.as_str()),
                submitted.last_name.as_deref().unwrap_or(user.last_name.as_str()),
                submitted.email.as_deref().unwrap_or(user.email.as_str()),
            ],
            &errors,
        )
    }
}

/// Login form
#[derive(Debug, Clone)]
pub struct SessionFormView {
    pub action: &'static str,
    pub email: String,
}

impl SessionFormView {
    pub fn new(email: &str) -> Self {
        Self {
            action: ROUTE_SESSION,
            email: email.to_string(),
        }
    }
}
