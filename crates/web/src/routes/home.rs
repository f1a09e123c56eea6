//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::PageContext;
use super::snippets::SnippetView;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub snippets: Vec<SnippetView>,
}

/// Display the latest snippets.
#[instrument(skip(state, ctx))]
pub async fn home(State(state): State<AppState>, ctx: PageContext) -> Result<impl IntoResponse> {
    let snippets = state
        .snippets()
        .latest()
        .await?
        .iter()
        .map(SnippetView::from)
        .collect();

    Ok(HomeTemplate { ctx, snippets })
}
