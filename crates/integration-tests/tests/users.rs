//! Signup, login and logout.

use reqwest::StatusCode;

use snippetbox_integration_tests::{ALICE_PASSWORD, TestServer};

const SIGNUP_FORM_TAG: &str = "<form action='/users/signup' method='POST' novalidate>";
const LOGIN_FORM_TAG: &str = "<form action='/users/login' method='POST' novalidate>";

#[tokio::test]
async fn test_user_signup() {
    const VALID_NAME: &str = "Bob";
    const VALID_PASSWORD: &str = "validPa$$word";
    const VALID_EMAIL: &str = "bob@example.com";

    struct Case {
        name: &'static str,
        user_name: &'static str,
        email: &'static str,
        password: &'static str,
        valid_csrf: bool,
        want_status: StatusCode,
        want_body: &'static str,
    }

    let server = TestServer::start().await;

    let cases = [
        Case {
            name: "Valid submission",
            user_name: VALID_NAME,
            email: VALID_EMAIL,
            password: VALID_PASSWORD,
            valid_csrf: true,
            want_status: StatusCode::SEE_OTHER,
            want_body: "",
        },
        Case {
            name: "Invalid CSRF token",
            user_name: VALID_NAME,
            email: VALID_EMAIL,
            password: VALID_PASSWORD,
            valid_csrf: false,
            want_status: StatusCode::BAD_REQUEST,
            want_body: "",
        },
        Case {
            name: "Empty name",
            user_name: "",
            email: VALID_EMAIL,
            password: VALID_PASSWORD,
            valid_csrf: true,
            want_status: StatusCode::UNPROCESSABLE_ENTITY,
            want_body: SIGNUP_FORM_TAG,
        },
        Case {
            name: "Empty email",
            user_name: VALID_NAME,
            email: "",
            password: VALID_PASSWORD,
            valid_csrf: true,
            want_status: StatusCode::UNPROCESSABLE_ENTITY,
            want_body: SIGNUP_FORM_TAG,
        },
        Case {
            name: "Empty password",
            user_name: VALID_NAME,
            email: VALID_EMAIL,
            password: "",
            valid_csrf: true,
            want_status: StatusCode::UNPROCESSABLE_ENTITY,
            want_body: SIGNUP_FORM_TAG,
        },
        Case {
            name: "Invalid email",
            user_name: VALID_NAME,
            email: "bob@example.",
            password: VALID_PASSWORD,
            valid_csrf: true,
            want_status: StatusCode::UNPROCESSABLE_ENTITY,
            want_body: SIGNUP_FORM_TAG,
        },
        Case {
            name: "Short password",
            user_name: VALID_NAME,
            email: VALID_EMAIL,
            password: "pa$$",
            valid_csrf: true,
            want_status: StatusCode::UNPROCESSABLE_ENTITY,
            want_body: SIGNUP_FORM_TAG,
        },
        Case {
            name: "Duplicate email",
            user_name: VALID_NAME,
            email: "dupe@example.com",
            password: VALID_PASSWORD,
            valid_csrf: true,
            want_status: StatusCode::UNPROCESSABLE_ENTITY,
            want_body: "Email address is already in use",
        },
    ];

    for case in cases {
        let client = server.client();
        let page = client.get("/users/signup").await;
        assert_eq!(page.status, StatusCode::OK, "{}", case.name);

        let token = page.csrf_token();
        let mut form = vec![
            ("name", case.user_name),
            ("email", case.email),
            ("password", case.password),
        ];
        if case.valid_csrf {
            form.push(("csrf_token", token.as_str()));
        }

        let res = client.post_form("/users/signup", &form).await;
        assert_eq!(res.status, case.want_status, "{}", case.name);
        assert!(res.body.contains(case.want_body), "{}: {}", case.name, res.body);
    }
}

#[tokio::test]
async fn test_signup_echoes_form_without_password() {
    let server = TestServer::start().await;
    let client = server.client();
    let token = client.get("/users/signup").await.csrf_token();

    let res = client
        .post_form(
            "/users/signup",
            &[
                ("name", "Carol"),
                ("email", "carol@example.com"),
                ("password", "short"),
                ("csrf_token", &token),
            ],
        )
        .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.body.contains("value='Carol'"));
    assert!(res.body.contains("value='carol@example.com'"));
    assert!(!res.body.contains("short"));
    assert!(res.body.contains("This field must be at least 8 characters long"));
}

#[tokio::test]
async fn test_signup_then_login() {
    let server = TestServer::start().await;
    let client = server.client();
    let token = client.get("/users/signup").await.csrf_token();

    let res = client
        .post_form(
            "/users/signup",
            &[
                ("name", "Dave"),
                ("email", "dave@example.com"),
                ("password", "validPa$$word"),
                ("csrf_token", &token),
            ],
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/users/login"));

    let res = client.get("/users/login").await;
    assert!(res.body.contains("Your signup was successful. Please log in."));

    let res = client.login("dave@example.com", "validPa$$word").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/snippets/create"));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    const INCORRECT: &str = "Email or password is incorrect";
    const BLANK: &str = "This field cannot be blank";

    let server = TestServer::start().await;

    let cases = [
        ("Wrong password", "alice@example.com", "not-the-password", INCORRECT),
        ("Unknown email", "nobody@example.com", ALICE_PASSWORD, INCORRECT),
        ("Blank email", "", ALICE_PASSWORD, BLANK),
        ("Invalid email", "alice@", ALICE_PASSWORD, "This field must be a valid email address"),
        ("Blank password", "alice@example.com", "", BLANK),
    ];

    for (name, email, password, want_error) in cases {
        let res = server.client().login(email, password).await;
        assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY, "{name}");
        assert!(res.body.contains(want_error), "{name}");
        assert!(res.body.contains(LOGIN_FORM_TAG), "{name}");
    }
}

#[tokio::test]
async fn test_login_requires_csrf_token() {
    let server = TestServer::start().await;
    let client = server.client();
    client.get("/users/login").await;

    let res = client
        .post_form(
            "/users/login",
            &[("email", "alice@example.com"), ("password", ALICE_PASSWORD)],
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = client
        .post_form(
            "/users/login",
            &[
                ("email", "alice@example.com"),
                ("password", ALICE_PASSWORD),
                ("csrf_token", "forged"),
            ],
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_returns_to_requested_page() {
    let server = TestServer::start().await;
    let client = server.client();

    let res = client.get("/snippets/create").await;
    assert_eq!(res.location(), Some("/users/login"));

    let res = client.login("alice@example.com", ALICE_PASSWORD).await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/snippets/create"));
}

#[tokio::test]
async fn test_login_rotates_session_cookie() {
    let server = TestServer::start().await;
    let client = server.client();

    let page = client.get("/users/login").await;
    let before = page.headers.get(reqwest::header::SET_COOKIE).cloned();
    assert!(before.is_some());

    let res = client.login("alice@example.com", ALICE_PASSWORD).await;
    let after = res.headers.get(reqwest::header::SET_COOKIE).cloned();
    assert!(after.is_some());
    assert_ne!(before, after);
}

#[tokio::test]
async fn test_logout() {
    let server = TestServer::start().await;
    let client = server.client();
    client.login("alice@example.com", ALICE_PASSWORD).await;

    let page = client.get("/").await;
    assert!(page.body.contains("action='/users/logout'"));
    let token = page.csrf_token();

    let res = client
        .post_form("/users/logout", &[("csrf_token", &token)])
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/"));

    let res = client.get("/").await;
    assert!(res.body.contains("been logged out successfully!"));
    assert!(!res.body.contains("action='/users/logout'"));

    let res = client.get("/snippets/create").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_logout_requires_login() {
    let server = TestServer::start().await;
    let client = server.client();
    let token = client.get("/users/login").await.csrf_token();

    let res = client
        .post_form("/users/logout", &[("csrf_token", &token)])
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location(), Some("/users/login"));
}

#[tokio::test]
async fn test_logout_requires_csrf_token() {
    let server = TestServer::start().await;
    let client = server.client();
    client.login("alice@example.com", ALICE_PASSWORD).await;

    let res = client.post_form("/users/logout", &[]).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = client
        .post_form("/users/logout", &[("csrf_token", "forged")])
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let page = client.get("/").await;
    assert!(page.body.contains("action='/users/logout'"));
    assert!(!page.body.contains("been logged out successfully!"));
    assert_eq!(client.get("/snippets/create").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_flash_survives_a_redirecting_post() {
    let server = TestServer::start().await;
    let client = server.client();
    client.login("alice@example.com", ALICE_PASSWORD).await;
    let token = client.get("/").await.csrf_token();

    let res = client
        .post_form("/users/logout", &[("csrf_token", &token)])
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    // Log straight back in without rendering a page in between
    let res = client
        .post_form(
            "/users/login",
            &[
                ("email", "alice@example.com"),
                ("password", ALICE_PASSWORD),
                ("csrf_token", &token),
            ],
        )
        .await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);

    let res = client.get("/snippets/create").await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("been logged out successfully!"));
}
