//! Session-stored types and keys.
//!
//! The session is the browser-local half of the system: it carries the
//! signed-in identity plus the cart and wishlist lists, serialized on
//! every mutation.

use serde::{Deserialize, Serialize};

use sockshop_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Identity assigned by the auth service.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the serialized cart entries.
    pub const CART: &str = "cart";

    /// Key for the serialized wishlist.
    pub const WISHLIST: &str = "wishlist";
}
