//! Checkout and order route handlers.
//!
//! All three require a signed-in user. The submit handler owns the
//! session round-trip (load cart, run the workflow, persist the cart);
//! the workflow itself lives in [`crate::checkout`].

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use sockshop_core::{Order, OrderId};

use crate::cart::{CartRepository, SessionCartRepository};
use crate::checkout::{DeliveryForm, place_order};
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Successful checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// Key for the order-confirmation view.
    pub order_id: OrderId,
    pub order: Order,
}

/// Order history response.
#[derive(Debug, Serialize)]
pub struct OrderHistoryResponse {
    pub orders: Vec<Order>,
}

/// Place an order from the session cart.
#[instrument(skip(state, session, form), fields(user_id = %user.id))]
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    session: Session,
    Json(form): Json<DeliveryForm>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    let repo = SessionCartRepository::new(session);
    let mut cart = repo.load_cart().await?;

    let order = place_order(state.docstore(), &user, &form, &mut cart).await?;

    // The workflow cleared the cart; make the cleared state durable
    repo.save_cart(&cart).await?;

    tracing::info!(order_id = %order.id, "order placed");
    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order_id: order.id.clone(),
            order,
        }),
    ))
}

/// The signed-in user's orders, newest first.
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn order_history(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<OrderHistoryResponse>> {
    let orders = state.docstore().list_orders_for_user(&user.id).await?;
    Ok(Json(OrderHistoryResponse { orders }))
}

/// One of the signed-in user's orders, by id (confirmation view).
///
/// Someone else's order id answers 404, not 403, so order ids don't
/// leak existence.
#[instrument(skip(state), fields(user_id = %user.id, order_id = %id))]
pub async fn order_confirmation(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let order = state.docstore().get_order(&id).await?;

    if order.user_id != user.id {
        return Err(AppError::NotFound(format!("order {id}")));
    }

    Ok(Json(order))
}
