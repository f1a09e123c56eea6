//! Data every page template needs.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::{AuthenticatedUser, CsrfToken};
use crate::models::session_keys;

/// Per-request page context shared by all templates.
///
/// Extracting it pops the flash message, so the message is shown exactly
/// once. Handlers that may redirect instead of rendering take
/// [`DeferredPageContext`] and load it only on the render path.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// One-shot message left by the previous request
    pub flash: Option<String>,
    /// Whether the request comes from a logged-in user
    pub is_authenticated: bool,
    /// Token for the hidden `csrf_token` form field
    pub csrf_token: String,
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        DeferredPageContext::from_request_parts(parts, state)
            .await?
            .load()
            .await
    }
}

/// Everything needed for a [`PageContext`] except the flash, which stays
/// in the session until [`DeferredPageContext::load`] is called.
pub struct DeferredPageContext {
    session: Session,
    is_authenticated: bool,
    csrf_token: CsrfToken,
}

impl DeferredPageContext {
    /// Pop the flash message and build the page context.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(self) -> Result<PageContext, AppError> {
        let flash = self.session.remove::<String>(session_keys::FLASH).await?;

        Ok(PageContext {
            flash,
            is_authenticated: self.is_authenticated,
            csrf_token: self.csrf_token.0,
        })
    }
}

impl<S> FromRequestParts<S> for DeferredPageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;

        let csrf_token = CsrfToken::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});

        Ok(Self {
            session,
            is_authenticated: parts.extensions.get::<AuthenticatedUser>().is_some(),
            csrf_token,
        })
    }
}

/// Leave a one-shot message for the next page the user sees.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn set_flash(session: &Session, message: &str) -> Result<(), AppError> {
    session.insert(session_keys::FLASH, message).await?;
    Ok(())
}
