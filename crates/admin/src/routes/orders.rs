//! Order route handlers.
//!
//! Orders are immutable after creation except for their status; the
//! status-change handler follows the write-then-refetch pattern.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use sockshop_core::{Order, OrderId, OrderStatus};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::routes::dashboard::{DashboardData, refresh};
use crate::state::AppState;

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Order detail with line items (backs the status-change screen).
#[instrument(skip(state), fields(admin = %admin.email, id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    Ok(Json(state.store().get_order(&id).await?))
}

/// Change an order's lifecycle status.
#[instrument(skip(state), fields(admin = %admin.email, id = %id, status = %request.status))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<DashboardData>> {
    state
        .store()
        .update_order_status(&id, request.status)
        .await?;
    tracing::info!(id = %id, status = %request.status, "order status updated");

    Ok(Json(refresh(state.store()).await?))
}
