//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::{
    error::{AuthError, AuthResult},
    models::Credentials,
};

/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a new password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

/// Validate a registration envelope
pub fn validate_registration(credentials: &Credentials) -> AuthResult<()> {
    validate_email(&credentials.email).map_err(AuthError::Validation)?;
    validate_password(&credentials.password).map_err(AuthError::Validation)?;
    Ok(())
}

/// Validate a login envelope.
///
/// Only presence is checked for the password so that accounts created under
/// older rules can still sign in.
pub fn validate_login(credentials: &Credentials) -> AuthResult<()> {
    validate_email(&credentials.email).map_err(AuthError::Validation)?;

    if credentials.password.is_empty() {
        return Err(AuthError::Validation("Password is required".to_string()));
    }

    Ok(())
}
