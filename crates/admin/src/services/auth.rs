//! Auth service client for admin sign-in.
//!
//! Admin accounts are ordinary identities in the hosted auth service;
//! what makes them admins is the email allow-list, checked after
//! sign-in succeeds. This client only needs the sign-in call.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use sockshop_core::{Email, EmailError, UserId};

use crate::config::AdminConfig;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Errors from admin authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password is wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

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

/// An identity record returned by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthIdentity {
    pub user_id: UserId,
    pub email: Email,
}

/// Client for the hosted auth service, admin surface.
#[derive(Clone)]
pub struct AdminAuthClient {
    inner: Arc<AdminAuthClientInner>,
}

struct AdminAuthClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AdminAuthClient {
    /// Create a new auth client from the admin configuration.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminAuthClientInner {
                client: reqwest::Client::new(),
                base_url: config.auth_service_url.trim_end_matches('/').to_string(),
                api_key: config.auth_service_api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is
    /// wrong; allow-list membership is NOT checked here.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError> {
        let email = Email::parse(email)?;

        let response = self
            .inner
            .client
            .post(format!("{}/v1/accounts:sign_in", self.inner.base_url))
            .header(API_KEY_HEADER, &self.inner.api_key)
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::NOT_FOUND {
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Service {
                status: status.as_u16(),
                message: response_text.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&response_text).map_err(AuthError::Parse)
    }
}
