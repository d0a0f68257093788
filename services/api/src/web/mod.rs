pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::web::state::AppState;

pub use middleware::require_admin;
pub use rest::{
    create_video_handler, delete_video_handler, get_video_handler, list_videos_handler,
    suggest_metadata_handler, update_video_handler,
};

/// Builds the API router: public read and auth routes, plus the mutating
/// routes behind the admin gate. CORS and Swagger are layered on by the
/// binary; tests drive this router directly.
pub fn router(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/videos", get(list_videos_handler))
        .route("/videos/{id}", get(get_video_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (admin session required)
    let protected_routes = Router::new()
        .route("/videos", post(create_video_handler))
        .route(
            "/videos/{id}",
            put(update_video_handler).delete(delete_video_handler),
        )
        .route("/suggestions", post(suggest_metadata_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
