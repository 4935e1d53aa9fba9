//! Wishlist route handlers.
//!
//! Set-like membership by product id; adding an existing member is a
//! no-op, so the handlers are safe to retry.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use sockshop_core::ProductId;

use crate::cart::{CartRepository, ProductSnapshot, SessionCartRepository, Wishlist};
use crate::error::Result;
use crate::state::AppState;

/// Wishlist view returned from every wishlist endpoint.
#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub items: Vec<ProductSnapshot>,
}

impl From<&Wishlist> for WishlistResponse {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            items: wishlist.items().to_vec(),
        }
    }
}

/// Wishlist membership request.
#[derive(Debug, Deserialize)]
pub struct WishlistRequest {
    pub product_id: ProductId,
}

/// Show the current wishlist.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<WishlistResponse>> {
    let repo = SessionCartRepository::new(session);
    let wishlist = repo.load_wishlist().await?;
    Ok(Json(WishlistResponse::from(&wishlist)))
}

/// Add a product to the wishlist (idempotent).
#[instrument(skip(state, session), fields(product_id = %request.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<WishlistRequest>,
) -> Result<Json<WishlistResponse>> {
    let product = state.docstore().get_product(&request.product_id).await?;

    let repo = SessionCartRepository::new(session);
    let mut wishlist = repo.load_wishlist().await?;
    wishlist.add(ProductSnapshot::from(&product));
    repo.save_wishlist(&wishlist).await?;

    Ok(Json(WishlistResponse::from(&wishlist)))
}

/// Remove a product from the wishlist.
#[instrument(skip(session), fields(product_id = %request.product_id))]
pub async fn remove(
    session: Session,
    Json(request): Json<WishlistRequest>,
) -> Result<Json<WishlistResponse>> {
    let repo = SessionCartRepository::new(session);
    let mut wishlist = repo.load_wishlist().await?;
    wishlist.remove(&request.product_id);
    repo.save_wishlist(&wishlist).await?;

    Ok(Json(WishlistResponse::from(&wishlist)))
}
