//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB connectivity)
//!
//! # Catalog
//! GET  /products               - Product listing (sellable only)
//! GET  /products/{id}          - Product detail with gallery
//!
//! # Cart
//! GET  /cart                   - Current cart
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Set an entry's quantity (0 removes)
//! POST /cart/remove            - Remove an entry
//!
//! # Wishlist
//! GET  /wishlist               - Current wishlist
//! POST /wishlist/add           - Add a product (idempotent)
//! POST /wishlist/remove        - Remove a product
//!
//! # Checkout & Orders (require auth)
//! POST /checkout               - Place an order from the cart
//! GET  /orders                 - Own order history, newest first
//! GET  /orders/{id}            - Own order by id (confirmation view)
//!
//! # Auth
//! POST /auth/register          - Create account + profile document
//! POST /auth/login             - Sign in
//! POST /auth/logout            - Sign out
//! GET  /auth/me                - Current identity + auth-service phase
//!
//! # Contact
//! POST /contact                - Submit a contact message
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .nest("/products", product_routes())
        // Cart & wishlist
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        // Checkout and order history
        .route("/checkout", post(checkout::submit))
        .route("/orders", get(checkout::order_history))
        .route("/orders/{id}", get(checkout::order_confirmation))
        // Auth
        .nest("/auth", auth_routes())
        // Contact
        .route("/contact", post(contact::submit))
}
