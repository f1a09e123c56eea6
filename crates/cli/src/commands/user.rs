//! User management commands.
//!
//! ```bash
//! snippetbox-cli user create -n "Alice" -e alice@example.com -p 'correct horse'
//! ```

use snippetbox_core::{UserId, validator};
use snippetbox_web::db::PgUserRepository;
use snippetbox_web::services::AuthService;
use snippetbox_web::services::auth::{MAX_NAME_CHARS, MIN_PASSWORD_LENGTH};

use super::{CommandError, connect};

/// Create a new user account.
///
/// Applies the same rules as the signup form.
pub async fn create(name: &str, email: &str, password: &str) -> Result<UserId, CommandError> {
    validate(name, email, password)?;

    let pool = connect().await?;
    let users = PgUserRepository::new(pool);
    let user = AuthService::new(&users).register(name, email, password).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User created");
    Ok(user.id)
}

fn validate(name: &str, email: &str, password: &str) -> Result<(), CommandError> {
    if !validator::not_blank(name) {
        return Err(CommandError::InvalidInput("name cannot be blank".to_string()));
    }
    if !validator::max_chars(name, MAX_NAME_CHARS) {
        return Err(CommandError::InvalidInput(format!(
            "name must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    if !validator::is_email(email) {
        return Err(CommandError::InvalidInput(format!("invalid email: {email}")));
    }
    if !validator::min_chars(password, MIN_PASSWORD_LENGTH) {
        return Err(CommandError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
