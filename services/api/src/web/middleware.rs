//! services/api/src/web/middleware.rs
//!
//! Admin-gate middleware for protecting mutating routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::web::state::AppState;

/// Middleware that checks the shared admin-session flag.
///
/// The session is one process-wide boolean, not a per-user credential, so
/// there is nothing to extract into the request: either the shared flag is
/// set and the request proceeds, or the caller gets 401 Unauthorized.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let authenticated = state.catalog.read().await.is_admin();
    if !authenticated {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}
