//! Integration tests for Sockshop.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL and create the session tables
//! cargo run -p sockshop-cli -- migrate all
//!
//! # Start both binaries, then:
//! cargo test -p sockshop-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need running servers
//! and hosted-service credentials (or local stand-ins) in the
//! environment.

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create an HTTP client with a cookie store, so the session cookie
/// issued on the first response rides along on later requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique throwaway email for registration tests.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}+{}@sockshop.example", uuid::Uuid::new_v4())
}
