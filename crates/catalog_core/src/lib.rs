pub mod domain;
pub mod ports;
pub mod store;

pub use domain::{MetadataSuggestion, UnknownQuality, VideoDraft, VideoEntry, VideoQuality};
pub use ports::{
    CatalogLoad, CredentialVerifier, MetadataSuggestionService, PortError, PortResult,
    StorageService,
};
pub use store::{CatalogBootstrap, CatalogError, CatalogStore};
