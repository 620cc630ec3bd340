//! User-facing strings.
//!
//! The application ships in English only; every flash text and page title
//! lives here so handlers and templates never hardcode copy.

pub const APP_NAME: &str = "Task manager";

// Flash: session
pub const FLASH_SESSION_CREATE_SUCCESS: &str = "You are logged in";
pub const FLASH_SESSION_CREATE_ERROR: &str = "Wrong email or password";
pub const FLASH_SESSION_DELETE_SUCCESS: &str = "You are logged out";

// Flash: users
pub const FLASH_USERS_NOT_ALLOWED: &str = "You cant edit another user";
pub const FLASH_USERS_CREATE_SUCCESS: &str = "User registered successfully";
pub const FLASH_USERS_CREATE_ERROR: &str = "Failed to register";
pub const FLASH_USERS_UPDATE_SUCCESS: &str = "User changed";
pub const FLASH_USERS_UPDATE_ERROR: &str = "updating error";
pub const FLASH_USERS_DELETE_SUCCESS: &str = "User deleted";
pub const FLASH_USERS_DELETE_ERROR: &str = "Failed to delete user";

// Flash: authentication gate
pub const FLASH_AUTH_ERROR: &str = "Access denied! Please login";

// Validation (the derive-based rules on domain types carry their own text)
pub const ERROR_EMAIL_TAKEN: &str = "Email is already taken";
