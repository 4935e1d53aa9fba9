//! Contact message listing route handler (read-only).
//!
//! Messages are written by the public storefront; admin only reads them.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use sockshop_core::ContactMessage;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Contact listing response.
#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    pub contacts: Vec<ContactMessage>,
}

/// All contact messages, newest first.
#[instrument(skip(state), fields(admin = %admin.email))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<ContactsResponse>> {
    let contacts = state.store().list_contacts().await?;
    Ok(Json(ContactsResponse { contacts }))
}
