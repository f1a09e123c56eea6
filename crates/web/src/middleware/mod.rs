//! HTTP middleware stack.
//!
//! # Layer Order (outermost first)
//!
//! Standard tier, wrapping every route including `/static` and `/ping`:
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. Panic recovery (`recover_panic_layer`)
//! 3. Request logging (`trace_layer`)
//! 4. Request ID
//! 5. Security headers
//!
//! Dynamic tier, wrapping page routes:
//!
//! 6. Session load/save (tower-sessions)
//! 7. CSRF verification
//! 8. Auth context (`authenticate`)
//!
//! Protected tier, wrapping login-only routes:
//!
//! 9. Auth gate (`require_authentication`)

pub mod auth;
pub mod csrf;
pub mod recover;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod trace;

pub use auth::{
    AuthenticatedUser, authenticate, clear_authenticated_user,
    require_authentication, set_authenticated_user, take_redirect_after_login,
};
pub use csrf::{CsrfToken, verify_csrf};
pub use recover::recover_panic_layer;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use trace::trace_layer;
