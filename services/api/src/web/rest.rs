//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the catalog REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use catalog_core::domain::{VideoDraft, VideoEntry, VideoQuality};
use catalog_core::ports::PortError;
use catalog_core::store::CatalogError;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_videos_handler,
        get_video_handler,
        create_video_handler,
        update_video_handler,
        delete_video_handler,
        suggest_metadata_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
    ),
    components(
        schemas(
            VideoResponse,
            CreateVideoRequest,
            UpdateVideoRequest,
            SuggestionRequest,
            SuggestionResponse,
            crate::web::auth::LoginRequest,
            crate::web::auth::SessionResponse,
        )
    ),
    tags(
        (name = "Video Catalog API", description = "API endpoints for the video catalog and its admin panel.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// One catalog entry as served to clients.
#[derive(Serialize, ToSchema)]
pub struct VideoResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub duration: String,
    pub category: String,
    pub tags: Vec<String>,
    pub upload_date: DateTime<Utc>,
    pub is_downloadable: bool,
    pub quality_options: Vec<String>,
    pub views: u64,
}

impl VideoResponse {
    fn from_domain(entry: &VideoEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            thumbnail_url: entry.thumbnail_url.clone(),
            video_url: entry.video_url.clone(),
            duration: entry.duration.clone(),
            category: entry.category.clone(),
            tags: entry.tags.clone(),
            upload_date: entry.upload_date,
            is_downloadable: entry.is_downloadable,
            quality_options: entry
                .quality_options
                .iter()
                .map(|q| q.label().to_string())
                .collect(),
            views: entry.views,
        }
    }
}

/// The creation payload. Identity and provenance (`id`, `upload_date`,
/// `views`) are assigned server-side.
#[derive(Deserialize, ToSchema)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub duration: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_downloadable: bool,
    #[serde(default)]
    pub quality_options: Vec<String>,
}

/// The update payload: a whole replacement entry. Update is replace, not
/// merge, so every field travels, including `upload_date` and `views`.
#[derive(Deserialize, ToSchema)]
pub struct UpdateVideoRequest {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub duration: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_downloadable: bool,
    #[serde(default)]
    pub quality_options: Vec<String>,
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub views: u64,
}

#[derive(Deserialize, ToSchema)]
pub struct SuggestionRequest {
    pub prompt: String,
}

#[derive(Serialize, ToSchema)]
pub struct SuggestionResponse {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn parse_qualities(labels: &[String]) -> Result<Vec<VideoQuality>, (StatusCode, String)> {
    labels
        .iter()
        .map(|label| label.parse::<VideoQuality>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

fn map_catalog_error(e: CatalogError) -> (StatusCode, String) {
    match e {
        CatalogError::DuplicateId(id) => (
            StatusCode::CONFLICT,
            format!("an entry with id '{id}' already exists"),
        ),
        CatalogError::Port(e) => {
            error!("Catalog mutation failed to persist: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to persist the catalog".to_string(),
            )
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the catalog, most recent first.
#[utoipa::path(
    get,
    path = "/videos",
    responses(
        (status = 200, description = "The full catalog", body = [VideoResponse])
    )
)]
pub async fn list_videos_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = state.catalog.read().await;
    let videos: Vec<VideoResponse> = catalog.videos().iter().map(VideoResponse::from_domain).collect();
    Json(videos)
}

/// Fetch a single catalog entry by id.
#[utoipa::path(
    get,
    path = "/videos/{id}",
    responses(
        (status = 200, description = "The entry", body = VideoResponse),
        (status = 404, description = "No entry with this id")
    ),
    params(
        ("id" = String, Path, description = "The entry's opaque id.")
    )
)]
pub async fn get_video_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let catalog = state.catalog.read().await;
    match catalog.video(&id) {
        Some(entry) => Ok(Json(VideoResponse::from_domain(entry))),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("no video with id '{id}'"),
        )),
    }
}

/// Add a new entry to the catalog.
///
/// The server assigns the id, the upload date, and a zero view count; an
/// empty quality list falls back to the default label.
#[utoipa::path(
    post,
    path = "/videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Entry created", body = VideoResponse),
        (status = 401, description = "Admin session required"),
        (status = 409, description = "Duplicate id"),
        (status = 422, description = "Unknown quality label"),
        (status = 500, description = "The catalog could not be persisted")
    )
)]
pub async fn create_video_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateVideoRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Validate the quality labels before touching the store.
    let quality_options = parse_qualities(&req.quality_options)?;

    // 2. Assemble the full entry from the draft.
    let draft = VideoDraft {
        title: req.title,
        description: req.description,
        thumbnail_url: req.thumbnail_url,
        video_url: req.video_url,
        duration: req.duration,
        category: req.category,
        tags: req.tags,
        is_downloadable: req.is_downloadable,
        quality_options,
    };
    let entry = draft.into_entry(Uuid::new_v4().to_string(), Utc::now());
    let response = VideoResponse::from_domain(&entry);

    // 3. Create through the store, which also persists the collection.
    state
        .catalog
        .write()
        .await
        .create(entry)
        .await
        .map_err(map_catalog_error)?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Replace the entry with the given id.
#[utoipa::path(
    put,
    path = "/videos/{id}",
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Entry replaced", body = VideoResponse),
        (status = 401, description = "Admin session required"),
        (status = 404, description = "No entry with this id"),
        (status = 422, description = "Unknown quality label"),
        (status = 500, description = "The catalog could not be persisted")
    ),
    params(
        ("id" = String, Path, description = "The entry's opaque id.")
    )
)]
pub async fn update_video_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateVideoRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let quality_options = parse_qualities(&req.quality_options)?;

    let entry = VideoEntry {
        id: id.clone(),
        title: req.title,
        description: req.description,
        thumbnail_url: req.thumbnail_url,
        video_url: req.video_url,
        duration: req.duration,
        category: req.category,
        tags: req.tags,
        upload_date: req.upload_date,
        is_downloadable: req.is_downloadable,
        quality_options: if quality_options.is_empty() {
            vec![VideoQuality::Q720p]
        } else {
            quality_options
        },
        views: req.views,
    };
    let response = VideoResponse::from_domain(&entry);

    let replaced = state
        .catalog
        .write()
        .await
        .update(entry)
        .await
        .map_err(map_catalog_error)?;

    // The store treats a missing id as a no-op; at the HTTP boundary that
    // becomes a 404 so the admin UI can tell the entry is gone.
    if !replaced {
        return Err((StatusCode::NOT_FOUND, format!("no video with id '{id}'")));
    }

    Ok((StatusCode::OK, Json(response)))
}

/// Delete the entry with the given id.
///
/// Idempotent: deleting an id that is already gone is still a 204.
#[utoipa::path(
    delete,
    path = "/videos/{id}",
    responses(
        (status = 204, description = "Entry deleted (or already absent)"),
        (status = 401, description = "Admin session required"),
        (status = 500, description = "The catalog could not be persisted")
    ),
    params(
        ("id" = String, Path, description = "The entry's opaque id.")
    )
)]
pub async fn delete_video_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .catalog
        .write()
        .await
        .delete(&id)
        .await
        .map_err(map_catalog_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Ask the suggestion service for a metadata draft.
///
/// The result only seeds a form on the caller's side; nothing is written
/// to the catalog here, and a failure leaves every draft field untouched.
#[utoipa::path(
    post,
    path = "/suggestions",
    request_body = SuggestionRequest,
    responses(
        (status = 200, description = "A metadata suggestion", body = SuggestionResponse),
        (status = 401, description = "Admin session required"),
        (status = 422, description = "Empty prompt"),
        (status = 502, description = "The suggestion service failed"),
        (status = 503, description = "Suggestions are not configured")
    )
)]
pub async fn suggest_metadata_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SuggestionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.prompt.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "prompt must not be empty".to_string(),
        ));
    }

    match state.suggestions.suggest_metadata(&req.prompt).await {
        Ok(suggestion) => Ok(Json(SuggestionResponse {
            title: suggestion.title,
            description: suggestion.description,
            category: suggestion.category,
            tags: suggestion.tags,
        })),
        Err(PortError::Unavailable(reason)) => Err((StatusCode::SERVICE_UNAVAILABLE, reason)),
        Err(e) => {
            error!("Suggestion request failed: {:?}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                "The suggestion service failed".to_string(),
            ))
        }
    }
}
