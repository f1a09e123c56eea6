//! HTTP route handlers and the application router.
//!
//! # Route Structure
//!
//! ```text
//! GET  /static/*              - CSS, JS and images (no session)
//! GET  /ping                  - Liveness probe, always "pong"
//!
//! # Dynamic (session, CSRF, auth context)
//! GET  /                      - Latest snippets
//! GET  /snippets/{id}/view    - Snippet detail
//! GET  /users/signup          - Signup form
//! POST /users/signup          - Create account
//! GET  /users/login           - Login form
//! POST /users/login           - Log in
//!
//! # Protected (dynamic + login required)
//! GET  /snippets/create       - Snippet form
//! POST /snippets/create       - Create snippet
//! POST /users/logout          - Log out
//! ```

pub mod context;
pub mod home;
pub mod snippets;
pub mod users;

use std::path::Path;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{MethodRouter, get, post},
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_sessions::SessionStore;

pub use context::{DeferredPageContext, PageContext, set_flash};

use crate::middleware::{
    authenticate, create_session_layer, recover_panic_layer, request_id_middleware,
    require_authentication, security_headers_middleware, trace_layer, verify_csrf,
};
use crate::state::AppState;

/// Build the complete application router.
///
/// `session_store` backs the session layer; production passes the
/// `PostgreSQL` store and tests pass `MemoryStore`.
///
/// The dynamic and protected tiers are attached per method router with
/// `MethodRouter::route_layer`, which leaves the 405 fallback bare: a wrong
/// method on a page path is answered without loading a session, checking
/// CSRF or redirecting to login.
pub fn app<Store>(state: AppState, session_store: Store, static_dir: impl AsRef<Path>) -> Router
where
    Store: SessionStore + Clone,
{
    let dynamic = ServiceBuilder::new()
        .layer(create_session_layer(session_store, state.secure_cookies()))
        .layer(from_fn(verify_csrf))
        .layer(from_fn_with_state(state.clone(), authenticate));

    let page = |route: MethodRouter<AppState>| route.route_layer(dynamic.clone());
    let protected =
        |route: MethodRouter<AppState>| page(route.route_layer(from_fn(require_authentication)));

    Router::new()
        .route("/ping", get(ping))
        .route("/", page(get(home::home)))
        .route("/snippets/{id}/view", page(get(snippets::view)))
        .route(
            "/users/signup",
            page(get(users::signup).post(users::signup_post)),
        )
        .route(
            "/users/login",
            page(get(users::login).post(users::login_post)),
        )
        .route(
            "/snippets/create",
            protected(get(snippets::create).post(snippets::create_post)),
        )
        .route("/users/logout", protected(post(users::logout_post)))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(trace_layer())
        .layer(recover_panic_layer())
}

/// Liveness probe that bypasses sessions entirely.
async fn ping() -> &'static str {
    "pong"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::db::memory::{MemorySnippetRepository, MemoryUserRepository};

    fn test_app() -> Router {
        let state = AppState::with_repositories(
            false,
            Arc::new(MemorySnippetRepository::default()),
            Arc::new(MemoryUserRepository::default()),
        );
        app(state, MemoryStore::default(), "static")
    }

    async fn send(request: Request<Body>) -> axum::response::Response {
        test_app().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_ping_skips_session() {
        let response = send(Request::get("/ping").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(response.headers().get(header::X_FRAME_OPTIONS).unwrap(), "deny");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"pong");
    }

    #[tokio::test]
    async fn test_pages_start_a_session() {
        let response = send(Request::get("/users/login").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.starts_with("snippetbox_session="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_protected_route_redirects_to_login() {
        let response = send(
            Request::get("/snippets/create")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/users/login");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_with_headers() {
        let response = send(Request::get("/nope").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
    }

    #[tokio::test]
    async fn test_wrong_method_is_405() {
        for (method, path) in [
            ("DELETE", "/users/login"),
            ("PUT", "/users/signup"),
            ("POST", "/snippets/1/view"),
            ("DELETE", "/snippets/create"),
            ("GET", "/users/logout"),
        ] {
            let response = send(
                Request::builder()
                    .method(method)
                    .uri(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

            assert_eq!(
                response.status(),
                StatusCode::METHOD_NOT_ALLOWED,
                "{method} {path}"
            );
            assert!(response.headers().contains_key(header::ALLOW), "{method} {path}");
            assert!(
                response.headers().get(header::SET_COOKIE).is_none(),
                "{method} {path}"
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_snippet_ids_are_404() {
        for path in [
            "/snippets/0/view",
            "/snippets/-1/view",
            "/snippets/1.23/view",
            "/snippets/foo/view",
            "/snippets/1/view",
        ] {
            let response = send(Request::get(path).body(Body::empty()).unwrap()).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
        }
    }
}
