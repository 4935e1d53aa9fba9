//! Clients for hosted services.

pub mod auth;

pub use auth::{AdminAuthClient, AuthError};
