//! Clients for hosted services.

pub mod auth;

pub use auth::{AuthClient, AuthContext, AuthError, AuthIdentity, AuthPhase};
