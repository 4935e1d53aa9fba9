//! Auth route handlers.
//!
//! Credentials go straight to the hosted auth service; on success the
//! identity lands in the session. Registration also mirrors the identity
//! into the `users` collection so admin and order ownership can see it.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use sockshop_core::UserProfile;

use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::services::auth::{AuthIdentity, AuthPhase};
use crate::session::{CurrentUser, keys};
use crate::state::AppState;

/// Credentials for register and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Identity view returned after register/login and from /auth/me.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
}

impl From<&CurrentUser> for UserResponse {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
        }
    }
}

/// Current-session view.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Option<UserResponse>,
    /// Auth-service readiness: `loading`, `ready`, or `error`.
    pub auth_service: &'static str,
}

/// Create an account, mirror its profile, and sign the session in.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let identity = state
        .auth()
        .sign_up(&request.email, &request.password)
        .await?;

    // Mirror the identity into the users collection; id matches the
    // auth identity so the profile can be fetched by it
    let profile = UserProfile {
        id: identity.user_id.clone(),
        email: identity.email.to_string(),
        display_name: None,
        created_at: None,
    };
    state.docstore().put_user_profile(&profile).await?;

    let user = sign_session_in(&session, &identity).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Sign in and store the identity in the session.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<UserResponse>> {
    let identity = state
        .auth()
        .sign_in(&request.email, &request.password)
        .await?;

    let user = sign_session_in(&session, &identity).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Sign out: drop the identity, keep the cart.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    let _: Option<CurrentUser> = session
        .remove(keys::CURRENT_USER)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current identity plus auth-service readiness.
#[instrument(skip(state, user))]
pub async fn me(State(state): State<AppState>, OptionalUser(user): OptionalUser) -> Json<MeResponse> {
    let auth_service = match state.auth_context().current() {
        AuthPhase::Loading => "loading",
        AuthPhase::Ready => "ready",
        AuthPhase::Error(_) => "error",
    };

    Json(MeResponse {
        user: user.as_ref().map(UserResponse::from),
        auth_service,
    })
}

async fn sign_session_in(session: &Session, identity: &AuthIdentity) -> Result<CurrentUser> {
    let user = CurrentUser {
        id: identity.user_id.clone(),
        email: identity.email.clone(),
    };
    session
        .insert(keys::CURRENT_USER, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    Ok(user)
}
