//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (session storage)
//! - `ADMIN_BASE_URL` - URL the admin API is served from
//! - `ADMIN_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `ADMIN_ALLOWED_EMAILS` - Comma-separated administrator email allow-list
//! - `DOCSTORE_URL` - Base URL of the hosted document store
//! - `DOCSTORE_ADMIN_API_KEY` - Privileged API key for the document store
//! - `AUTH_SERVICE_URL` - Base URL of the hosted auth service
//! - `AUTH_SERVICE_API_KEY` - API key for the auth service
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment label

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use sockshop_core::Email;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// URL the admin API is served from
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Administrator email allow-list; only these identities get in
    pub allowed_emails: Vec<Email>,
    /// Document store base URL
    pub docstore_url: String,
    /// Privileged document store API key
    pub docstore_api_key: SecretString,
    /// Auth service base URL
    pub auth_service_url: String,
    /// Auth service API key
    pub auth_service_api_key: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment label
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// including an empty or malformed allow-list.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ADMIN_DATABASE_URL")?;
        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("ADMIN_BASE_URL")?;
        url::Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_BASE_URL".to_string(), e.to_string()))?;

        let session_secret = SecretString::from(get_required_env("ADMIN_SESSION_SECRET")?);
        if session_secret.expose_secret().len() < MIN_SESSION_SECRET_LENGTH {
            return Err(ConfigError::InsecureSecret(
                "ADMIN_SESSION_SECRET".to_string(),
                format!("must be at least {MIN_SESSION_SECRET_LENGTH} characters"),
            ));
        }

        let allowed_emails = parse_allow_list(&get_required_env("ADMIN_ALLOWED_EMAILS")?)?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            allowed_emails,
            docstore_url: get_required_env("DOCSTORE_URL")?,
            docstore_api_key: SecretString::from(get_required_env("DOCSTORE_ADMIN_API_KEY")?),
            auth_service_url: get_required_env("AUTH_SERVICE_URL")?,
            auth_service_api_key: SecretString::from(get_required_env("AUTH_SERVICE_API_KEY")?),
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether an email is on the administrator allow-list.
    #[must_use]
    pub fn is_admin_email(&self, email: &Email) -> bool {
        self.allowed_emails.contains(email)
    }
}

/// Parse the comma-separated allow-list; it must contain at least one
/// well-formed address.
fn parse_allow_list(raw: &str) -> Result<Vec<Email>, ConfigError> {
    let mut emails = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let email = Email::parse(part).map_err(|e| {
            ConfigError::InvalidEnvVar("ADMIN_ALLOWED_EMAILS".to_string(), e.to_string())
        })?;
        if !emails.contains(&email) {
            emails.push(email);
        }
    }

    if emails.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "ADMIN_ALLOWED_EMAILS".to_string(),
            "allow-list must contain at least one email".to_string(),
        ));
    }

    Ok(emails)
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_list() {
        let emails = parse_allow_list("boss@sockshop.example, ops@sockshop.example").unwrap();
        assert_eq!(emails.len(), 2);
        assert_eq!(emails[0].as_str(), "boss@sockshop.example");
    }

    #[test]
    fn test_parse_allow_list_dedupes_and_normalizes() {
        let emails = parse_allow_list("Boss@Sockshop.example, boss@sockshop.example").unwrap();
        assert_eq!(emails.len(), 1);
    }

    #[test]
    fn test_parse_allow_list_skips_blanks() {
        let emails = parse_allow_list("boss@sockshop.example,, ,").unwrap();
        assert_eq!(emails.len(), 1);
    }

    #[test]
    fn test_parse_allow_list_rejects_empty() {
        assert!(parse_allow_list("").is_err());
        assert!(parse_allow_list(" , ,").is_err());
    }

    #[test]
    fn test_parse_allow_list_rejects_malformed() {
        assert!(parse_allow_list("not-an-email").is_err());
    }
}
