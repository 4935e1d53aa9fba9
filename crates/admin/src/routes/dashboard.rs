//! Dashboard snapshot.
//!
//! One response carrying the full contents of the three managed
//! collections. Mutating handlers reuse [`refresh`] so every write is
//! followed by the same full re-fetch.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use sockshop_core::{Order, Product, UserProfile};

use crate::docstore::{AdminStoreClient, StoreError};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Full dashboard snapshot.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub users: Vec<UserProfile>,
}

/// Re-fetch all three collections in full, sequentially.
///
/// # Errors
///
/// Returns the first store error encountered.
pub async fn refresh(store: &AdminStoreClient) -> std::result::Result<DashboardData, StoreError> {
    let products = store.list_products().await?;
    let orders = store.list_orders().await?;
    let users = store.list_users().await?;

    Ok(DashboardData {
        products,
        orders,
        users,
    })
}

/// Current dashboard snapshot.
#[instrument(skip(state), fields(admin = %admin.email))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<DashboardData>> {
    Ok(Json(refresh(state.store()).await?))
}
