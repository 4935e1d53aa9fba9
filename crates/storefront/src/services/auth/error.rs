//! Authentication error types.

use thiserror::Error;

use sockshop_core::EmailError;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password is wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password doesn't meet requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Email format is invalid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// HTTP request to the auth service failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The auth service rejected the request.
    #[error("auth service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
