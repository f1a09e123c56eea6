//! Signup, login and logout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use snippetbox_core::validator::{self, Validator};

use super::{DeferredPageContext, PageContext, set_flash};
use crate::error::Result;
use crate::filters;
use crate::middleware::{
    clear_authenticated_user, set_authenticated_user, take_redirect_after_login,
};
use crate::services::AuthError;
use crate::services::auth::{MAX_NAME_CHARS, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

/// Where users land after logging in when no page was remembered.
const DEFAULT_LOGIN_REDIRECT: &str = "/snippets/create";

const BLANK: &str = "This field cannot be blank";
const INVALID_EMAIL: &str = "This field must be a valid email address";

// =============================================================================
// Form Types
// =============================================================================

/// Signup form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignupForm {
    fn validate(&self) -> Validator {
        let mut v = Validator::default();
        v.check_field(validator::not_blank(&self.name), "name", BLANK);
        v.check_field(
            validator::max_chars(&self.name, MAX_NAME_CHARS),
            "name",
            "This field cannot be more than 255 characters long",
        );
        v.check_field(validator::not_blank(&self.email), "email", BLANK);
        v.check_field(validator::is_email(&self.email), "email", INVALID_EMAIL);
        v.check_field(validator::not_blank(&self.password), "password", BLANK);
        v.check_field(
            validator::min_chars(&self.password, MIN_PASSWORD_LENGTH),
            "password",
            "This field must be at least 8 characters long",
        );
        v
    }

    /// The form as echoed back to the user; passwords are never re-rendered.
    fn without_password(self) -> Self {
        Self {
            password: String::new(),
            ..self
        }
    }
}

/// Login form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    fn validate(&self) -> Validator {
        let mut v = Validator::default();
        v.check_field(validator::not_blank(&self.email), "email", BLANK);
        v.check_field(validator::is_email(&self.email), "email", INVALID_EMAIL);
        v.check_field(validator::not_blank(&self.password), "password", BLANK);
        v
    }

    fn without_password(self) -> Self {
        Self {
            password: String::new(),
            ..self
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/signup.html")]
pub struct SignupTemplate {
    pub ctx: PageContext,
    pub form: SignupForm,
    pub errors: Validator,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
    pub form: LoginForm,
    pub errors: Validator,
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup(ctx: PageContext) -> impl IntoResponse {
    SignupTemplate {
        ctx,
        form: SignupForm::default(),
        errors: Validator::default(),
    }
}

/// Handle signup form submission.
#[instrument(skip_all)]
pub async fn signup_post(
    State(state): State<AppState>,
    session: Session,
    ctx: DeferredPageContext,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let mut errors = form.validate();

    if errors.is_valid() {
        match state
            .auth()
            .register(&form.name, &form.email, &form.password)
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User signed up");
                set_flash(&session, "Your signup was successful. Please log in.").await?;
                return Ok(Redirect::to("/users/login").into_response());
            }
            Err(AuthError::UserAlreadyExists) => {
                errors.add_field_error("email", "Email address is already in use");
            }
            Err(AuthError::InvalidEmail(_)) => {
                errors.add_field_error("email", INVALID_EMAIL);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok((
        StatusCode::UNPROCESSABLE_ENTITY,
        SignupTemplate {
            ctx: ctx.load().await?,
            form: form.without_password(),
            errors,
        },
    )
        .into_response())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login(ctx: PageContext) -> impl IntoResponse {
    LoginTemplate {
        ctx,
        form: LoginForm::default(),
        errors: Validator::default(),
    }
}

/// Handle login form submission.
///
/// On success the session ID is rotated and the user is sent back to the
/// page that bounced them to login, or to the snippet form.
#[instrument(skip_all)]
pub async fn login_post(
    State(state): State<AppState>,
    session: Session,
    ctx: DeferredPageContext,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let mut errors = form.validate();

    if errors.is_valid() {
        match state.auth().authenticate(&form.email, &form.password).await {
            Ok(user_id) => {
                set_authenticated_user(&session, user_id).await?;
                tracing::info!(%user_id, "User logged in");

                let destination = take_redirect_after_login(&session)
                    .await?
                    .unwrap_or_else(|| DEFAULT_LOGIN_REDIRECT.to_string());
                return Ok(Redirect::to(&destination).into_response());
            }
            Err(AuthError::InvalidCredentials) => {
                tracing::debug!("Login rejected");
                errors.add_non_field_error("Email or password is incorrect");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok((
        StatusCode::UNPROCESSABLE_ENTITY,
        LoginTemplate {
            ctx: ctx.load().await?,
            form: form.without_password(),
            errors,
        },
    )
        .into_response())
}

// =============================================================================
// Logout Route
// =============================================================================

/// Log the current user out.
#[instrument(skip_all)]
pub async fn logout_post(session: Session) -> Result<Response> {
    clear_authenticated_user(&session).await?;
    set_flash(&session, "You've been logged out successfully!").await?;
    tracing::info!("User logged out");
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup("Bob", "bob@example.com", "validPa$$word").validate().is_valid());
    }

    #[test]
    fn test_signup_field_errors() {
        let v = signup("", "bob@example.", "pa$$").validate();
        assert_eq!(v.field_error("name"), Some(BLANK));
        assert_eq!(v.field_error("email"), Some(INVALID_EMAIL));
        assert_eq!(
            v.field_error("password"),
            Some("This field must be at least 8 characters long")
        );
    }

    #[test]
    fn test_signup_name_fits_column() {
        let longest = "n".repeat(MAX_NAME_CHARS);
        assert!(signup(&longest, "bob@example.com", "validPa$$word").validate().is_valid());

        let v = signup(&format!("{longest}n"), "bob@example.com", "validPa$$word").validate();
        assert_eq!(
            v.field_error("name"),
            Some("This field cannot be more than 255 characters long")
        );
    }

    #[test]
    fn test_blank_email_reports_blank_first() {
        let v = signup("Bob", "", "validPa$$word").validate();
        assert_eq!(v.field_error("email"), Some(BLANK));
    }

    #[test]
    fn test_echoed_forms_drop_password() {
        let form = signup("Bob", "bob@example.com", "validPa$$word").without_password();
        assert_eq!(form.name, "Bob");
        assert_eq!(form.email, "bob@example.com");
        assert!(form.password.is_empty());

        let login = LoginForm {
            email: "bob@example.com".to_string(),
            password: "secret".to_string(),
        }
        .without_password();
        assert!(login.password.is_empty());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let v = LoginForm::default().validate();
        assert_eq!(v.field_error("email"), Some(BLANK));
        assert_eq!(v.field_error("password"), Some(BLANK));
    }
}
