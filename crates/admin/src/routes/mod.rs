//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB connectivity)
//!
//! # Auth
//! POST /auth/login             - Sign in (allow-list enforced here)
//! POST /auth/logout            - Sign out
//!
//! # Dashboard (requires admin)
//! GET  /dashboard              - Full snapshot: products, orders, users
//!
//! # Products (requires admin)
//! POST   /products             - Create product, returns fresh snapshot
//! PATCH  /products/{id}        - Update product, returns fresh snapshot
//! DELETE /products/{id}        - Delete product, returns fresh snapshot
//!
//! # Orders (requires admin)
//! GET  /orders/{id}            - Order detail with line items
//! POST /orders/{id}/status     - Change status, returns fresh snapshot
//!
//! # Users & Contacts (requires admin, read-only)
//! GET  /users                  - All user profiles
//! GET  /contacts               - All contact messages
//! ```
//!
//! Every mutating handler re-fetches all collections in full afterwards
//! and responds with the fresh snapshot, instead of patching a cached
//! view. Redundant reads, but the response can never drift from the
//! store.

pub mod auth;
pub mod contacts;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/", post(products::create)).route(
        "/{id}",
        patch(products::update).delete(products::delete),
    )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::update_status))
}

/// Create all routes for admin.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::show))
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .route("/users", get(users::index))
        .route("/contacts", get(contacts::index))
        .nest("/auth", auth_routes())
}
