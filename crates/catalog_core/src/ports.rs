//! crates/catalog_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;

use crate::domain::{MetadataSuggestion, VideoEntry};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Port
//=========================================================================================

/// The outcome of reading the persisted catalog record.
///
/// Absence and corruption are distinct so the host can warn about a
/// discarded record instead of silently reseeding over it.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLoad {
    /// No catalog record has ever been written.
    Empty,
    /// A record exists but could not be decoded; the reason is carried along.
    Corrupt(String),
    /// The persisted catalog, in stored (most-recent-first) order.
    Loaded(Vec<VideoEntry>),
}

/// The persistence port for the catalog and the admin-session record.
///
/// Implementations own two independent records under fixed keys: the full
/// catalog (rewritten in its entirety on every save, read once at startup)
/// and the session flag (the literal `"true"` when authenticated, removed
/// otherwise).
#[async_trait]
pub trait StorageService: Send + Sync {
    // --- Catalog Record ---
    async fn load_catalog(&self) -> PortResult<CatalogLoad>;

    /// Persists the whole collection. This is always a full rewrite,
    /// never a delta; a failure here must surface to the caller.
    async fn save_catalog(&self, entries: &[VideoEntry]) -> PortResult<()>;

    // --- Session Record ---
    /// Returns true only when the stored session value is exactly `"true"`.
    async fn load_session(&self) -> PortResult<bool>;

    async fn save_session(&self) -> PortResult<()>;

    async fn clear_session(&self) -> PortResult<()>;
}

//=========================================================================================
// Credential Port
//=========================================================================================

/// Verifies an admin credential.
///
/// The comparison strategy (fixed secret, password hash, external identity
/// provider) is an implementation concern; callers only see a boolean.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> PortResult<bool>;
}

//=========================================================================================
// Suggestion Port
//=========================================================================================

/// Produces a structured metadata suggestion from a free-text prompt.
///
/// One outbound request per invocation: no caching of prior prompts and no
/// automatic retry. Callers are expected to suppress the call for an empty
/// prompt.
#[async_trait]
pub trait MetadataSuggestionService: Send + Sync {
    async fn suggest_metadata(&self, prompt: &str) -> PortResult<MetadataSuggestion>;
}
