//! Snippet route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use snippetbox_core::{
    SnippetId,
    validator::{self, Validator},
};

use super::{DeferredPageContext, PageContext, set_flash};
use crate::error::{AppError, Result};
use crate::filters::{self, human_date};
use crate::models::Snippet;
use crate::state::AppState;

/// Longest accepted snippet title, in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Lifetimes a snippet may be created with, in days.
pub const PERMITTED_EXPIRES_DAYS: [i32; 3] = [1, 7, 365];

/// Lifetime preselected on the create form.
const DEFAULT_EXPIRES_DAYS: &str = "365";

// =============================================================================
// View Types
// =============================================================================

/// A snippet prepared for display.
#[derive(Debug, Clone)]
pub struct SnippetView {
    pub id: SnippetId,
    pub title: String,
    pub content: String,
    pub created: String,
    pub expires: String,
}

impl From<&Snippet> for SnippetView {
    fn from(snippet: &Snippet) -> Self {
        Self {
            id: snippet.id,
            title: snippet.title.clone(),
            content: snippet.content.clone(),
            created: human_date(Some(&snippet.created)),
            expires: human_date(Some(&snippet.expires)),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Snippet creation form data.
///
/// `expires` stays textual so a tampered value is reported on the form
/// instead of rejected by the extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct SnippetCreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub expires: String,
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: DEFAULT_EXPIRES_DAYS.to_string(),
        }
    }
}

impl SnippetCreateForm {
    /// Check the form, returning the lifetime in days when valid.
    fn validate(&self) -> (Validator, Option<i32>) {
        let mut v = Validator::default();
        v.check_field(
            validator::not_blank(&self.title),
            "title",
            "This field cannot be blank",
        );
        v.check_field(
            validator::max_chars(&self.title, MAX_TITLE_CHARS),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(
            validator::not_blank(&self.content),
            "content",
            "This field cannot be blank",
        );

        let expires = self
            .expires
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|days| validator::permitted_value(days, &PERMITTED_EXPIRES_DAYS));
        v.check_field(
            expires.is_some(),
            "expires",
            "This field must equal 1, 7 or 365",
        );

        (v, expires)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Snippet detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/view.html")]
pub struct ViewTemplate {
    pub ctx: PageContext,
    pub snippet: SnippetView,
}

/// Snippet creation page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/create.html")]
pub struct CreateTemplate {
    pub ctx: PageContext,
    pub form: SnippetCreateForm,
    pub errors: Validator,
}

// =============================================================================
// Routes
// =============================================================================

/// Display a single snippet.
///
/// Any ID that is not a positive integer, or that names a missing or
/// expired snippet, is a 404.
#[instrument(skip(state, ctx))]
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ctx: PageContext,
) -> Result<impl IntoResponse> {
    let id = SnippetId::parse_positive(&id).ok_or(AppError::NotFound)?;
    let snippet = state
        .snippets()
        .get(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ViewTemplate {
        ctx,
        snippet: SnippetView::from(&snippet),
    })
}

/// Display the snippet creation form.
pub async fn create(ctx: PageContext) -> impl IntoResponse {
    CreateTemplate {
        ctx,
        form: SnippetCreateForm::default(),
        errors: Validator::default(),
    }
}

/// Handle snippet creation form submission.
#[instrument(skip(state, session, ctx, form))]
pub async fn create_post(
    State(state): State<AppState>,
    session: Session,
    ctx: DeferredPageContext,
    Form(form): Form<SnippetCreateForm>,
) -> Result<Response> {
    let (errors, expires) = form.validate();
    let Some(expires) = expires.filter(|_| errors.is_valid()) else {
        let ctx = ctx.load().await?;
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            CreateTemplate { ctx, form, errors },
        )
            .into_response());
    };

    let id = state
        .snippets()
        .insert(&form.title, &form.content, expires)
        .await?;
    tracing::info!(snippet_id = %id, expires_days = expires, "Snippet created");

    set_flash(&session, "Snippet successfully created!").await?;
    Ok(Redirect::to(&format!("/snippets/{id}/view")).into_response())
}
