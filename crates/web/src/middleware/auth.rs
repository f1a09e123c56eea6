//! Authentication middleware and extractors.
//!
//! Two layers cooperate:
//!
//! - [`authenticate`] runs on every dynamic route. It resolves the session's
//!   user ID against the database and, if the user still exists, marks the
//!   request with an [`AuthenticatedUser`] extension. It never rejects.
//! - [`require_authentication`] runs only on protected routes and redirects
//!   anonymous requests to the login page.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header::CACHE_CONTROL},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use snippetbox_core::UserId;

use crate::error::AppError;
use crate::models::session_keys;
use crate::state::AppState;

/// Login page that anonymous visitors are sent to.
pub const LOGIN_PATH: &str = "/users/login";

/// Request extension marking a request made by a logged-in, existing user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

/// Resolve the session's user and attach [`AuthenticatedUser`] when valid.
///
/// A session pointing at a deleted user is treated as anonymous.
///
/// # Errors
///
/// Returns `AppError::Session` or `AppError::Database` if the lookup fails.
pub async fn authenticate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(user_id) = session
        .get::<UserId>(session_keys::AUTHENTICATED_USER_ID)
        .await?
    {
        if state.users().exists(user_id).await? {
            request.extensions_mut().insert(AuthenticatedUser(user_id));
        } else {
            tracing::debug!(%user_id, "Session refers to a user that no longer exists");
        }
    }

    Ok(next.run(request).await)
}

/// Gate for routes that need a logged-in user.
///
/// Anonymous GET requests remember their path so login can return there.
/// Authenticated responses are marked `Cache-Control: no-store` so pages
/// behind the gate are not served from a shared browser cache.
///
/// # Errors
///
/// Returns `AppError::Session` if the redirect path cannot be stored.
pub async fn require_authentication(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.extensions().get::<AuthenticatedUser>().is_none() {
        if request.method() == Method::GET {
            session
                .insert(session_keys::REDIRECT_AFTER_LOGIN, request.uri().path())
                .await?;
        }
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}

/// Mark the session as belonging to `user_id` (login).
///
/// The session ID is rotated first to prevent session fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_authenticated_user(
    session: &Session,
    user_id: UserId,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::AUTHENTICATED_USER_ID, user_id)
        .await
}

/// Remove the authenticated user from the session (logout).
///
/// The session ID is rotated so the old cookie cannot be replayed.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_authenticated_user(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .remove::<UserId>(session_keys::AUTHENTICATED_USER_ID)
        .await?;
    Ok(())
}

/// Take the remembered post-login path, if any.
///
/// Only site-relative paths are honoured.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn take_redirect_after_login(
    session: &Session,
) -> Result<Option<String>, tower_sessions::session::Error> {
    let path: Option<String> = session
        .remove(session_keys::REDIRECT_AFTER_LOGIN)
        .await?;
    Ok(path.filter(|p| p.starts_with('/') && !p.starts_with("//")))
}
