//! Landing page.

use axum::extract::State;

use super::page_context;
use crate::api::middleware::Session;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::HtmlPage;
use crate::views::WelcomePage;

pub async fn welcome(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<HtmlPage<WelcomePage>> {
    let page = page_context(&state, &session).await?;
    Ok(HtmlPage(WelcomePage { page }))
}
