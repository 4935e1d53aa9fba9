//! User listing route handler (read-only).

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use sockshop_core::UserProfile;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// User listing response.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserProfile>,
}

/// All user profiles. Admin never mutates these.
#[instrument(skip(state), fields(admin = %admin.email))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<UsersResponse>> {
    let users = state.store().list_users().await?;
    Ok(Json(UsersResponse { users }))
}
