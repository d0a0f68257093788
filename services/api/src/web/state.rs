//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use catalog_core::ports::MetadataSuggestionService;
use catalog_core::store::CatalogStore;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The shared application state, created once at startup and passed to all handlers.
///
/// The catalog store sits behind an `RwLock` so the read-modify-write-persist
/// sequence of each mutation is serialized across concurrent requests;
/// handlers that only read take the read half.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RwLock<CatalogStore>>,
    pub suggestions: Arc<dyn MetadataSuggestionService>,
    pub config: Arc<Config>,
}
