//! Admin auth route handlers.
//!
//! Sign-in goes to the hosted auth service, then the identity must pass
//! the static allow-list; only then does `CurrentAdmin` land in the
//! session. A valid account outside the allow-list gets 403 and no
//! session, so it never sees any dashboard data.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::session::{CurrentAdmin, keys};
use crate::state::AppState;

/// Admin credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Signed-in administrator view.
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub id: String,
    pub email: String,
}

/// Sign in as an administrator.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AdminResponse>> {
    let identity = state
        .auth()
        .sign_in(&request.email, &request.password)
        .await?;

    // The allow-list is the actual admin gate
    if !state.config().is_admin_email(&identity.email) {
        tracing::warn!(email = %identity.email, "sign-in from non-admin account rejected");
        return Err(AppError::Forbidden(identity.email.to_string()));
    }

    let admin = CurrentAdmin {
        id: identity.user_id,
        email: identity.email,
    };
    session
        .insert(keys::CURRENT_ADMIN, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(email = %admin.email, "admin signed in");
    Ok(Json(AdminResponse {
        id: admin.id.to_string(),
        email: admin.email.to_string(),
    }))
}

/// Sign out.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}
