//! Snippet viewing and creation.

use reqwest::{StatusCode, header};

use snippetbox_integration_tests::{ALICE_PASSWORD, POND_CONTENT, TestServer};

#[tokio::test]
async fn test_snippet_view() {
    let server = TestServer::start().await;

    let cases = [
        ("Valid ID", "/snippets/1/view", StatusCode::OK, POND_CONTENT),
        ("Non-existent ID", "/snippets/2/view", StatusCode::NOT_FOUND, ""),
        ("Negative ID", "/snippets/-1/view", StatusCode::NOT_FOUND, ""),
        ("Decimal ID", "/snippets/1.23/view", StatusCode::NOT_FOUND, ""),
        ("String ID", "/snippets/foo/view", StatusCode::NOT_FOUND, ""),
        ("Empty ID", "/snippets//view", StatusCode::NOT_FOUND, ""),
    ];

    for (name, path, want_status, want_body) in cases {
        let res = server.client().get(path).await;
        assert_eq!(res.status, want_status, "{name}");
        assert!(res.body.contains(want_body), "{name}: {}", res.body);
    }
}

#[tokio::test]
async fn test_home_lists_latest_snippets() {
    let server = TestServer::start().await;
    let res = server.client().get("/").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("An old silent pond"));
    assert!(res.body.contains("href='/snippets/1/view'"));
}

#[tokio::test]
async fn test_create_requires_login() {
    let server = TestServer::start().await;
    let client = server.client();

    let res = client.get("/snippets/create").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/users/login"));

    // Without a session the CSRF check rejects the post before the gate
    let res = client
        .post_form("/snippets/create", &[("title", "t"), ("content", "c")])
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_snippet_flow() {
    let server = TestServer::start().await;
    let client = server.client();

    let res = client.login("alice@example.com", ALICE_PASSWORD).await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let form_page = client.get("/snippets/create").await;
    assert_eq!(form_page.status, StatusCode::OK);
    assert_eq!(
        form_page
            .headers
            .get(header::CACHE_CONTROL)
            .map(|v| v.as_bytes()),
        Some(&b"no-store"[..])
    );
    let token = form_page.csrf_token();

    let res = client
        .post_form(
            "/snippets/create",
            &[
                ("title", "O snail"),
                ("content", "O snail\nClimb Mount Fuji,\nBut slowly, slowly!"),
                ("expires", "7"),
                ("csrf_token", &token),
            ],
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/snippets/2/view"));

    let res = client.get("/snippets/2/view").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("Snippet successfully created!"));
    assert!(res.body.contains("Climb Mount Fuji"));

    // Flash messages are shown once
    let res = client.get("/snippets/2/view").await;
    assert!(!res.body.contains("Snippet successfully created!"));
}

#[tokio::test]
async fn test_create_snippet_validation() {
    let server = TestServer::start().await;
    let client = server.client();
    client.login("alice@example.com", ALICE_PASSWORD).await;
    let token = client.get("/snippets/create").await.csrf_token();

    let long_title = "x".repeat(101);
    let cases = [
        ("Blank title", "", "content", "365", "This field cannot be blank"),
        (
            "Long title",
            long_title.as_str(),
            "content",
            "365",
            "This field cannot be more than 100 characters long",
        ),
        ("Blank content", "title", "  ", "365", "This field cannot be blank"),
        ("Bad expiry", "title", "content", "30", "This field must equal 1, 7 or 365"),
    ];

    for (name, title, content, expires, want_error) in cases {
        let res = client
            .post_form(
                "/snippets/create",
                &[
                    ("title", title),
                    ("content", content),
                    ("expires", expires),
                    ("csrf_token", &token),
                ],
            )
            .await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY, "{name}");
        assert!(res.body.contains(want_error), "{name}");
        assert!(res.body.contains("<form action='/snippets/create' method='POST'>"), "{name}");
    }
}

#[tokio::test]
async fn test_create_large_snippet() {
    let server = TestServer::start().await;
    let client = server.client();
    client.login("alice@example.com", ALICE_PASSWORD).await;
    let token = client.get("/snippets/create").await.csrf_token();

    let content = "a".repeat(70 * 1024);
    let res = client
        .post_form(
            "/snippets/create",
            &[
                ("title", "Long read"),
                ("content", &content),
                ("expires", "7"),
                ("csrf_token", &token),
            ],
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/snippets/2/view"));

    let res = client.get("/snippets/2/view").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains(&content));
}

#[tokio::test]
async fn test_create_requires_csrf_token_when_logged_in() {
    let server = TestServer::start().await;
    let client = server.client();
    client.login("alice@example.com", ALICE_PASSWORD).await;

    let form = [("title", "t"), ("content", "c"), ("expires", "7")];
    let res = client.post_form("/snippets/create", &form).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = client
        .post_form(
            "/snippets/create",
            &[
                ("title", "t"),
                ("content", "c"),
                ("expires", "7"),
                ("csrf_token", "forged"),
            ],
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    // Nothing was stored and the user is still logged in
    assert_eq!(client.get("/snippets/2/view").await.status, StatusCode::NOT_FOUND);
    assert_eq!(client.get("/snippets/create").await.status, StatusCode::OK);
}
