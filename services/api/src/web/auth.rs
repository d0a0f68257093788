//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for the shared admin session.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub is_admin: bool,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Authenticate the shared admin session
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 401, description = "Invalid password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Run the credential through the verifier; a success also persists
    //    the durable session record.
    let authenticated = state
        .catalog
        .write()
        .await
        .login(&req.password)
        .await
        .map_err(|e| {
            error!("Failed to process login: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process login".to_string(),
            )
        })?;

    // 2. A wrong password is the one error this API reports to end users
    //    directly.
    if !authenticated {
        return Err((StatusCode::UNAUTHORIZED, "Invalid password".to_string()));
    }

    Ok((StatusCode::OK, Json(SessionResponse { is_admin: true })))
}

/// POST /auth/logout - Clear the shared admin session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = SessionResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // Clears the in-memory flag and removes the durable session record.
    state.catalog.write().await.logout().await.map_err(|e| {
        error!("Failed to process logout: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to process logout".to_string(),
        )
    })?;

    Ok((StatusCode::OK, Json(SessionResponse { is_admin: false })))
}
