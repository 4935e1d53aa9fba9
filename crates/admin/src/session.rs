//! Session-stored types and keys for admin.

use serde::{Deserialize, Serialize};

use sockshop_core::{Email, UserId};

/// Session-stored administrator identity.
///
/// Only written after both sign-in AND the allow-list check succeed, so
/// its presence in a session is the authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Identity assigned by the auth service.
    pub id: UserId,
    /// Administrator's email address (on the allow-list at login time).
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in administrator.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
