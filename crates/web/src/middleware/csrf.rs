//! CSRF protection for state-changing requests.
//!
//! Every session carries one random token. Pages embed it in a hidden
//! `csrf_token` form field (or scripts send it as `X-CSRF-Token`), and any
//! POST, PUT, PATCH or DELETE without a matching token is rejected with
//! 400 Bad Request before the handler runs.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{HeaderMap, Method, header::CONTENT_TYPE, request::Parts},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// Name of the hidden form field carrying the token.
pub const CSRF_FORM_FIELD: &str = "csrf_token";

/// Header accepted as an alternative to the form field.
pub const CSRF_HEADER_NAME: &str = "x-csrf-token";

/// Largest form body buffered while looking for the token.
///
/// Matches axum's default extractor limit, so any form a handler would
/// accept is also read here.
pub const MAX_FORM_BYTES: usize = 2 * 1024 * 1024;

/// The session's CSRF token, available to handlers for form rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrfToken(pub String);

impl CsrfToken {
    /// Generate a new random token (256-bit, base64url-encoded).
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Get the token value for use in templates.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!("CSRF token not found in request extensions - middleware may be misconfigured");
            Self(String::new())
        }))
    }
}

/// Middleware that enforces and issues CSRF tokens.
///
/// Must run inside the session layer.
///
/// # Errors
///
/// Returns `AppError::BadRequest` when an unsafe request carries no token or
/// the wrong one, `AppError::PayloadTooLarge` when the form exceeds
/// [`MAX_FORM_BYTES`], and `AppError::Session` if the session store fails.
pub async fn verify_csrf(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let existing: Option<String> = session.get(session_keys::CSRF_TOKEN).await?;

    let mut request = if is_state_changing(request.method()) {
        let (request, submitted) = take_submitted_token(request).await?;
        let valid = match (&existing, &submitted) {
            (Some(expected), Some(got)) => constant_time_eq(expected.as_bytes(), got.as_bytes()),
            _ => false,
        };
        if !valid {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                token_present = submitted.is_some(),
                "Rejected request with missing or invalid CSRF token"
            );
            return Err(AppError::BadRequest("CSRF token missing or invalid".to_string()));
        }
        request
    } else {
        request
    };

    let token = match existing {
        Some(token) => CsrfToken(token),
        None => {
            let token = CsrfToken::generate();
            session.insert(session_keys::CSRF_TOKEN, token.value()).await?;
            token
        }
    };
    request.extensions_mut().insert(token);

    Ok(next.run(request).await)
}

const fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Pull the submitted token from the header or the urlencoded body.
///
/// The body is buffered and put back so the handler can still read the form.
async fn take_submitted_token(request: Request) -> Result<(Request, Option<String>), AppError> {
    if let Some(token) = header_token(request.headers()) {
        return Ok((request, Some(token)));
    }

    if !is_form(request.headers()) {
        return Ok((request, None));
    }

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_FORM_BYTES)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, limit = MAX_FORM_BYTES, "Form body could not be buffered");
            AppError::PayloadTooLarge
        })?;

    let token = url::form_urlencoded::parse(&bytes)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned());

    Ok((Request::from_parts(parts, Body::from(bytes)), token))
}

fn header_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b) {
        result |= x ^ y;
    }

    result == 0
}
