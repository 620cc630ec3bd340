//! HTTP request handlers.

pub mod session_handler;
pub mod user_handler;
pub mod welcome_handler;

pub use session_handler::session_routes;
pub use user_handler::{protected_user_routes, user_routes};
pub use welcome_handler::welcome;

use crate::api::middleware::Session;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::views::PageContext;

/// Layout data for a rendered page. Drains the pending flash messages, so
/// call it only for responses that render HTML.
pub(crate) async fn page_context(state: &AppState, session: &Session) -> AppResult<PageContext> {
    let current_user = match session.user_id().await {
        Some(id) => state.user_service.find_user(id).await?,
        None => None,
    };
    let flash = session.take_flash().await;
    Ok(PageContext::new(current_user.as_ref(), flash))
}
