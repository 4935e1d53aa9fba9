//! Authentication service client.
//!
//! Identity lives in a hosted email/password auth service; this module
//! only ships credentials to it and interprets its answers. No password
//! ever touches the local database.

mod context;
mod error;

pub use context::{AuthContext, AuthPhase, RETRY_DELAY};
pub use error::AuthError;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use sockshop_core::{Email, UserId};

use crate::config::AuthServiceConfig;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Minimum password length, checked before the credentials leave the box.
const MIN_PASSWORD_LENGTH: usize = 8;

/// An identity record returned by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthIdentity {
    /// Opaque identifier assigned by the auth service.
    pub user_id: UserId,
    /// Email the account was registered with.
    pub email: Email,
}

/// Error body returned by the auth service.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    error: ServiceErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceErrorDetail {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Client for the hosted auth service.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    /// Create a new auth service client.
    #[must_use]
    pub fn new(config: &AuthServiceConfig) -> Self {
        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    /// Register a new account with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        self.account_call("sign_up", &email, password).await
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity, AuthError> {
        let email = Email::parse(email)?;

        self.account_call("sign_in", &email, password).await
    }

    /// Probe the auth service.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), AuthError> {
        let response = self
            .inner
            .client
            .get(format!("{}/v1/health", self.inner.base_url))
            .header(API_KEY_HEADER, &self.inner.api_key)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthError::Service {
                status: status.as_u16(),
                message: "health check failed".to_string(),
            })
        }
    }

    async fn account_call(
        &self,
        action: &str,
        email: &Email,
        password: &str,
    ) -> Result<AuthIdentity, AuthError> {
        let response = self
            .inner
            .client
            .post(format!("{}/v1/accounts:{action}", self.inner.base_url))
            .header(API_KEY_HEADER, &self.inner.api_key)
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(map_service_error(status, &response_text));
        }

        match serde_json::from_str(&response_text) {
            Ok(identity) => Ok(identity),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse auth service response"
                );
                Err(AuthError::Parse(e))
            }
        }
    }
}

/// Map a non-success auth response onto the error taxonomy.
fn map_service_error(status: StatusCode, body: &str) -> AuthError {
    let detail = serde_json::from_str::<ServiceErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_default();

    match detail.code.as_str() {
        "INVALID_CREDENTIALS" | "USER_NOT_FOUND" => AuthError::InvalidCredentials,
        "EMAIL_EXISTS" => AuthError::UserAlreadyExists,
        "WEAK_PASSWORD" => AuthError::WeakPassword(if detail.message.is_empty() {
            "password rejected by auth service".to_string()
        } else {
            detail.message
        }),
        _ => AuthError::Service {
            status: status.as_u16(),
            message: if detail.message.is_empty() {
                body.chars().take(200).collect()
            } else {
                detail.message
            },
        },
    }
}

/// Validate password requirements before calling the service.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> AuthClient {
        AuthClient::new(&crate::config::AuthServiceConfig {
            base_url: server.uri(),
            api_key: SecretString::from("test-key"),
        })
    }

    #[test]
    fn test_validate_password_too_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough password").is_ok());
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:sign_in"))
            .and(body_json(serde_json::json!({
                "email": "jamie@example.com",
                "password": "hunter2hunter2",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user_id": "u-1",
                "email": "jamie@example.com",
            })))
            .mount(&server)
            .await;

        let identity = client_for(&server)
            .sign_in("Jamie@Example.com", "hunter2hunter2")
            .await
            .unwrap();
        assert_eq!(identity.user_id.as_str(), "u-1");
    }

    #[tokio::test]
    async fn test_sign_in_invalid_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:sign_in"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"code": "INVALID_CREDENTIALS", "message": "nope"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .sign_in("jamie@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_sign_up_email_exists() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:sign_up"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "error": {"code": "EMAIL_EXISTS"}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .sign_up("jamie@example.com", "hunter2hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_bad_email_locally() {
        // No mock mounted: the request must never reach the service
        let server = MockServer::start().await;
        let err = client_for(&server)
            .sign_up("not-an-email", "hunter2hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
    }
}
