//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        credentials::{Argon2Verifier, FixedSecretVerifier},
        db::DbAdapter,
        suggestion_llm::{DisabledSuggestionAdapter, OpenAiSuggestionAdapter},
    },
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use catalog_core::ports::{CredentialVerifier, MetadataSuggestionService};
use catalog_core::store::{CatalogBootstrap, CatalogStore};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Storage & Run Migrations ---
    info!("Opening catalog storage at {}...", config.database_url);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    db_adapter.run_migrations().await?;
    info!("Storage migrations complete.");

    // --- 3. Initialize the Credential Verifier ---
    let verifier: Arc<dyn CredentialVerifier> = match &config.admin_password_hash {
        Some(hash) => Arc::new(Argon2Verifier::new(hash.clone())),
        None => Arc::new(FixedSecretVerifier::new(config.admin_password.clone())),
    };

    // --- 4. Initialize the Suggestion Adapter ---
    let suggestions: Arc<dyn MetadataSuggestionService> = match &config.openai_api_key {
        Some(api_key) => {
            let openai_config = OpenAIConfig::new().with_api_key(api_key);
            let openai_client = Client::with_config(openai_config);
            Arc::new(OpenAiSuggestionAdapter::new(
                openai_client,
                config.suggestion_model.clone(),
                config.suggestion_timeout,
            ))
        }
        None => {
            warn!("OPENAI_API_KEY not set; metadata suggestions are disabled.");
            Arc::new(DisabledSuggestionAdapter)
        }
    };

    // --- 5. Open the Catalog Store ---
    let (store, bootstrap) = CatalogStore::open(db_adapter, verifier).await?;
    match bootstrap {
        CatalogBootstrap::Restored(count) => {
            info!("Restored {} catalog entries from storage.", count)
        }
        CatalogBootstrap::Seeded => info!("No stored catalog found; starting from the seed."),
        CatalogBootstrap::SeededAfterCorruption(reason) => warn!(
            "Stored catalog was unreadable and has been replaced by the seed: {}",
            reason
        ),
    }

    // --- 6. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        catalog: Arc::new(RwLock::new(store)),
        suggestions,
        config: config.clone(),
    });

    let allowed_origin = config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| {
            ApiError::Internal(format!(
                "Invalid CORS_ALLOWED_ORIGIN '{}': {}",
                config.cors_allowed_origin, e
            ))
        })?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 7. Create the Web Router ---
    let api_router = web::router(app_state).layer(cors);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 8. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
