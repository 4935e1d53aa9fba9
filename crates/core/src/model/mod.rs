//! Documents stored in the hosted collections.
//!
//! Four collections exist: `products`, `orders`, `users`, `contacts`.
//! The store assigns `id`, `created_at`, and `updated_at` on write, so
//! creation payloads are separate structs without those fields.

pub mod contact;
pub mod order;
pub mod product;
pub mod user;

pub use contact::{ContactMessage, NewContactMessage};
pub use order::{CustomerInfo, NewOrder, Order, OrderItem};
pub use product::{NewProduct, Product, ProductPatch};
pub use user::UserProfile;

/// Collection names in the hosted document store.
pub mod collections {
    pub const PRODUCTS: &str = "products";
    pub const ORDERS: &str = "orders";
    pub const USERS: &str = "users";
    pub const CONTACTS: &str = "contacts";
}
