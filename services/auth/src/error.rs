//! Custom error types for the authentication service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{jwt::TokenError, store::StoreError};

/// Custom error type for authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Request body failed shape validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Registration hit an email that is already taken
    #[error("Email already exists")]
    AccountExists,

    /// Unknown email or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, forged or expired session token
    #[error("Unauthorized")]
    Unauthenticated,

    /// The authenticated account no longer exists
    #[error("User not found")]
    AccountNotFound,

    /// Credential store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing failure
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Token could not be issued
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl AuthError {
    /// HTTP status reported for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::AccountExists => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::AccountNotFound => StatusCode::NOT_FOUND,
            AuthError::Store(_) | AuthError::Hashing(_) | AuthError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Validation(msg) => msg.clone(),
            AuthError::Store(_) | AuthError::Hashing(_) | AuthError::Token(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
