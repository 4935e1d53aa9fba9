//! Sockshop Core - Shared types library.
//!
//! This crate provides common types used across all Sockshop components:
//! - `storefront` - Public-facing shop API
//! - `admin` - Internal administration API
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! database access. Both binaries talk to the same hosted document
//! collections, so the document model lives here and the clients live
//! with their binaries.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email, status enums, lenient coercion
//! - [`model`] - Documents stored in the hosted collections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod model;
pub mod types;

pub use model::*;
pub use types::*;
