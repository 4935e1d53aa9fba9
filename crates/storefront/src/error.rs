//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to
//! Sentry before responding to the client. All route handlers should
//! return `Result<T, AppError>`. Responses are JSON:
//! `{"error": "..."}`, plus a `fields` map for validation failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cart::CartStoreError;
use crate::checkout::CheckoutError;
use crate::docstore::DocStoreError;
use crate::services::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document store operation failed.
    #[error("Document store error: {0}")]
    DocStore(#[from] DocStoreError),

    /// Auth service operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart/wishlist persistence failed.
    #[error("Cart store error: {0}")]
    CartStore(#[from] CartStoreError),

    /// Checkout workflow failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_fault(&self) -> bool {
        match self {
            Self::Internal(_) | Self::CartStore(_) => true,
            Self::DocStore(e) => !e.is_not_found(),
            Self::Checkout(e) => matches!(
                e,
                CheckoutError::Store(_) | CheckoutError::StockDecrementFailed { .. }
            ),
            Self::Auth(e) => matches!(e, AuthError::Http(_) | AuthError::Service { .. }),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server faults to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::DocStore(e) => docstore_status(e),
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Http(_) | AuthError::Service { .. } => StatusCode::BAD_GATEWAY,
            },
            Self::Checkout(e) => match e {
                CheckoutError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::ProductUnavailable { .. }
                | CheckoutError::Unsellable { .. }
                | CheckoutError::InsufficientStock { .. } => StatusCode::CONFLICT,
                CheckoutError::Store(e) => docstore_status(e),
                CheckoutError::StockDecrementFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::CartStore(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = match &self {
            // Validation failures carry the field map for the client
            Self::Checkout(CheckoutError::Validation(errors)) => serde_json::json!({
                "error": "Please fix the highlighted fields",
                "fields": errors,
            }),
            // The order committed; hand the id back so the client can
            // still show the confirmation
            Self::Checkout(CheckoutError::StockDecrementFailed { order_id, .. }) => {
                serde_json::json!({
                    "error": "Your order was placed but stock could not be fully updated",
                    "order_id": order_id,
                })
            }
            Self::Checkout(
                e @ (CheckoutError::ProductUnavailable { .. }
                | CheckoutError::Unsellable { .. }
                | CheckoutError::InsufficientStock { .. }),
            ) => serde_json::json!({"error": e.to_string()}),
            Self::NotFound(what) => serde_json::json!({"error": format!("Not found: {what}")}),
            Self::Unauthorized(_) => serde_json::json!({"error": "Authentication required"}),
            Self::BadRequest(message) => serde_json::json!({"error": message}),
            Self::Auth(e) => serde_json::json!({"error": auth_message(e)}),
            Self::DocStore(DocStoreError::NotFound { collection, id }) => {
                serde_json::json!({"error": format!("Not found: {collection}/{id}")})
            }
            // Don't expose internal error details to clients
            _ => serde_json::json!({"error": "Something went wrong. Please try again."}),
        };

        (status, Json(body)).into_response()
    }
}

const fn docstore_status(error: &DocStoreError) -> StatusCode {
    match error {
        DocStoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        DocStoreError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn auth_message(error: &AuthError) -> String {
    match error {
        AuthError::InvalidCredentials => "Invalid email or password".to_string(),
        AuthError::UserAlreadyExists => "An account with this email already exists".to_string(),
        AuthError::WeakPassword(message) => message.clone(),
        AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
        _ => "Authentication is temporarily unavailable".to_string(),
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sockshop_core::OrderId;

    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("product".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("login first".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::BadRequest("nope".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_statuses() {
        assert_eq!(
            status_of(AppError::Checkout(CheckoutError::InsufficientStock {
                name: "Sock A".to_string(),
                available: 5,
                requested: 10,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Checkout(CheckoutError::Validation(
                crate::checkout::ValidationErrors::default()
            ))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Checkout(CheckoutError::StockDecrementFailed {
                order_id: OrderId::new("o1"),
                source: DocStoreError::Api {
                    status: 500,
                    message: "boom".to_string(),
                },
            })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_statuses() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_docstore_maps_to_404() {
        let err = AppError::DocStore(DocStoreError::NotFound {
            collection: "products".to_string(),
            id: "p1".to_string(),
        });
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }
}
