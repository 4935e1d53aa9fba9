//! Cart route handlers.
//!
//! The cart lives in the session, not the store: handlers load it,
//! apply one pure mutation, persist it, and echo the updated view. The
//! add handler fetches the product once to capture its snapshot; stock
//! is deliberately NOT checked here (only checkout does).

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use sockshop_core::ProductId;

use crate::cart::{Cart, CartEntry, CartRepository, ProductSnapshot, SessionCartRepository};
use crate::error::Result;
use crate::state::AppState;

/// Cart view returned from every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartEntry>,
    pub total_price: Decimal,
    pub total_quantity: u32,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.entries().to_vec(),
            total_price: cart.total_price(),
            total_quantity: cart.total_quantity(),
        }
    }
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Update quantity request.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Show the current cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CartResponse>> {
    let repo = SessionCartRepository::new(session);
    let cart = repo.load_cart().await?;
    Ok(Json(CartResponse::from(&cart)))
}

/// Add one unit of a product to the cart.
///
/// Captures a snapshot of the product as it looks right now; the
/// snapshot is not refreshed again until checkout.
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let product = state.docstore().get_product(&request.product_id).await?;

    let repo = SessionCartRepository::new(session);
    let mut cart = repo.load_cart().await?;
    cart.add(ProductSnapshot::from(&product));
    repo.save_cart(&cart).await?;

    Ok(Json(CartResponse::from(&cart)))
}

/// Set an entry's quantity verbatim; zero or less removes the entry.
#[instrument(skip(session), fields(product_id = %request.product_id, quantity = request.quantity))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartResponse>> {
    let repo = SessionCartRepository::new(session);
    let mut cart = repo.load_cart().await?;
    cart.update_quantity(&request.product_id, request.quantity);
    repo.save_cart(&cart).await?;

    Ok(Json(CartResponse::from(&cart)))
}

/// Remove an entry from the cart.
#[instrument(skip(session), fields(product_id = %request.product_id))]
pub async fn remove(
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartResponse>> {
    let repo = SessionCartRepository::new(session);
    let mut cart = repo.load_cart().await?;
    cart.remove(&request.product_id);
    repo.save_cart(&cart).await?;

    Ok(Json(CartResponse::from(&cart)))
}
