//! Integration test harness for Snippetbox.
//!
//! [`TestServer::start`] serves the full application router on an ephemeral
//! local port, backed by in-memory repositories and an in-memory session
//! store, so the tests need no database.
//!
//! # Fixtures
//!
//! - Snippet #1 "An old silent pond"
//! - User `alice@example.com` / [`ALICE_PASSWORD`]
//! - User `dupe@example.com`, for duplicate signup checks
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p snippetbox-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use reqwest::{Client, StatusCode, header::HeaderMap, redirect};
use tokio::task::JoinHandle;
use tower_sessions::MemoryStore;

use snippetbox_web::AppState;
use snippetbox_web::db::SnippetRepository;
use snippetbox_web::db::memory::{MemorySnippetRepository, MemoryUserRepository};
use snippetbox_web::services::AuthService;

/// Password of the `alice@example.com` fixture user.
pub const ALICE_PASSWORD: &str = "pa$$word-alice";

/// Content of fixture snippet #1.
pub const POND_CONTENT: &str = "An old silent pond...";

static CSRF_TOKEN_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<input type='hidden' name='csrf_token' value='([^']+)'>")
        .expect("valid CSRF token regex")
});

/// A running application instance.
pub struct TestServer {
    base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start the application on `127.0.0.1` with fixture data loaded.
    pub async fn start() -> Self {
        let snippets = Arc::new(MemorySnippetRepository::default());
        let users = Arc::new(MemoryUserRepository::default());
        seed_fixtures(&snippets, &users).await;

        let state = AppState::with_repositories(false, snippets, users);
        let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../web/static");
        let app = snippetbox_web::app(state, MemoryStore::default(), static_dir);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener address");

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("test server");
        });

        Self {
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// A fresh client with an empty cookie jar.
    #[must_use]
    pub fn client(&self) -> TestClient {
        TestClient {
            base_url: self.base_url.clone(),
            client: Client::builder()
                .cookie_store(true)
                .redirect(redirect::Policy::none())
                .build()
                .expect("build HTTP client"),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn seed_fixtures(snippets: &MemorySnippetRepository, users: &MemoryUserRepository) {
    snippets
        .insert("An old silent pond", POND_CONTENT, 365)
        .await
        .expect("seed snippet");

    let auth = AuthService::new(users);
    auth.register("Alice", "alice@example.com", ALICE_PASSWORD)
        .await
        .expect("seed alice");
    auth.register("Dupe", "dupe@example.com", "validPa$$word")
        .await
        .expect("seed dupe");
}

/// A captured response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// The CSRF token embedded in the page.
    #[must_use]
    pub fn csrf_token(&self) -> String {
        extract_csrf_token(&self.body).expect("page contains a CSRF token")
    }
}

/// Cookie-carrying client that never follows redirects.
pub struct TestClient {
    base_url: String,
    client: Client,
}

impl TestClient {
    /// Send a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request");
        capture(response).await
    }

    /// Send an urlencoded POST request.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> TestResponse {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("POST request");
        capture(response).await
    }

    /// Log in through the login form, returning the login response.
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        let token = self.get("/users/login").await.csrf_token();
        self.post_form(
            "/users/login",
            &[
                ("email", email),
                ("password", password),
                ("csrf_token", &token),
            ],
        )
        .await
    }
}

async fn capture(response: reqwest::Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.text().await.expect("response body");
    TestResponse {
        status,
        headers,
        body,
    }
}

/// Pull the hidden `csrf_token` value out of an HTML page.
#[must_use]
pub fn extract_csrf_token(body: &str) -> Option<String> {
    CSRF_TOKEN_RX
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_csrf_token() {
        let body = "<form><input type='hidden' name='csrf_token' value='abc-_123'></form>";
        assert_eq!(extract_csrf_token(body).as_deref(), Some("abc-_123"));
        assert_eq!(extract_csrf_token("<p>no form</p>"), None);
    }
}
