//! Shared types used across layers.

mod field_errors;
mod flash;
mod response;

pub use field_errors::FieldErrors;
pub use flash::{Flash, FlashKind};
pub use response::{Found, HtmlPage};
