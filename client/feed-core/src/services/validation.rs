//! Locally-checked constraints, enforced before any remote mutation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 20;
const PASSWORD_MIN_LEN: usize = 6;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_]+$").expect("username regex is valid"));

/// Case-folds a username to lowercase. Applied at every entry point before
/// validation or comparison.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Validates an already-normalized username: required, 3-20 characters,
/// letters/digits/underscore only.
pub fn validate_username(username: &str) -> AppResult<()> {
    if username.is_empty() {
        return Err(AppError::Validation("username is required".into()));
    }
    if username.chars().count() < USERNAME_MIN_LEN {
        return Err(AppError::Validation(format!(
            "username must be at least {} characters",
            USERNAME_MIN_LEN
        )));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(AppError::Validation(format!(
            "username must be at most {} characters",
            USERNAME_MAX_LEN
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::Validation(
            "username may only contain letters, digits and underscore".into(),
        ));
    }
    Ok(())
}

/// Validates a password pair from the registration form
pub fn validate_password(password: &str, confirm: &str) -> AppResult<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }
    if password != confirm {
        return Err(AppError::Validation("passwords do not match".into()));
    }
    Ok(())
}
