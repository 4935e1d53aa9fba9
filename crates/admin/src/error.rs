//! Unified error handling for admin with Sentry integration.
//!
//! All route handlers return `Result<T, AppError>`; responses are JSON.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::docstore::StoreError;
use crate::services::AuthError;

/// Application-level error type for admin.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document store operation failed.
    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    /// Auth service operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in, but not on the administrator allow-list.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server faults to Sentry
        let is_server_fault = match &self {
            Self::Internal(_) => true,
            Self::Store(e) => !e.is_not_found(),
            Self::Auth(e) => matches!(e, AuthError::Http(_) | AuthError::Service { .. }),
            _ => false,
        };
        if is_server_fault {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Store(e) => {
                if e.is_not_found() {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Http(_) | AuthError::Service { .. } => StatusCode::BAD_GATEWAY,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Unauthorized(_) => "Admin authentication required".to_string(),
            Self::Forbidden(_) => "This account is not an administrator".to_string(),
            Self::BadRequest(message) => message.clone(),
            Self::Auth(AuthError::InvalidCredentials) => "Invalid email or password".to_string(),
            Self::Auth(AuthError::InvalidEmail(_)) => "Invalid email address".to_string(),
            Self::Store(StoreError::NotFound { collection, id }) => {
                format!("Not found: {collection}/{id}")
            }
            _ => "Something went wrong. Please try again.".to_string(),
        };

        (status, Json(serde_json::json!({"error": message}))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
