//! crates/catalog_core/src/store.rs
//!
//! The catalog store: single source of truth for the video collection and
//! the admin-session flag. All mutations go through this type, and every
//! mutation mirrors the full collection back to durable storage before it
//! returns.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{VideoDraft, VideoEntry, VideoQuality};
use crate::ports::{CatalogLoad, CredentialVerifier, PortError, StorageService};

//=========================================================================================
// Store Error and Bootstrap Types
//=========================================================================================

/// Errors surfaced by store mutations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// `create` was handed an id the collection already contains.
    #[error("an entry with id '{0}' already exists")]
    DuplicateId(String),
    /// A port (storage or credential) operation failed.
    #[error(transparent)]
    Port(#[from] PortError),
}

/// How the store obtained its initial collection.
///
/// `SeededAfterCorruption` lets the host log a warning about the discarded
/// record instead of silently reseeding over it.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogBootstrap {
    /// A persisted catalog was restored; carries the entry count.
    Restored(usize),
    /// No record existed; the fixed seed collection was used.
    Seeded,
    /// A record existed but could not be decoded; the seed was used instead.
    SeededAfterCorruption(String),
}

//=========================================================================================
// The Catalog Store
//=========================================================================================

/// Owns the in-memory entry collection and the admin-session flag.
///
/// Mutations take `&mut self`, so a host with concurrent callers must wrap
/// the store in a lock that serializes the whole read-modify-write-persist
/// sequence of each operation.
pub struct CatalogStore {
    videos: Vec<VideoEntry>,
    is_admin: bool,
    storage: Arc<dyn StorageService>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl CatalogStore {
    /// Opens the store against the given ports.
    ///
    /// Reads the persisted catalog once: a missing or undecodable record
    /// falls back to the fixed seed collection, and the returned
    /// [`CatalogBootstrap`] reports which case occurred. The session flag
    /// is restored from its own record.
    pub async fn open(
        storage: Arc<dyn StorageService>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Result<(Self, CatalogBootstrap), CatalogError> {
        let (videos, bootstrap) = match storage.load_catalog().await? {
            CatalogLoad::Loaded(entries) => {
                let count = entries.len();
                (entries, CatalogBootstrap::Restored(count))
            }
            CatalogLoad::Empty => (seed_catalog(), CatalogBootstrap::Seeded),
            CatalogLoad::Corrupt(reason) => {
                (seed_catalog(), CatalogBootstrap::SeededAfterCorruption(reason))
            }
        };

        let is_admin = storage.load_session().await?;

        Ok((
            Self {
                videos,
                is_admin,
                storage,
                verifier,
            },
            bootstrap,
        ))
    }

    // --- Read Accessors ---

    /// The collection, most-recent-first.
    pub fn videos(&self) -> &[VideoEntry] {
        &self.videos
    }

    /// Looks up a single entry by id.
    pub fn video(&self, id: &str) -> Option<&VideoEntry> {
        self.videos.iter().find(|v| v.id == id)
    }

    /// Whether the shared admin session is currently authenticated.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    // --- Mutations ---

    /// Adds a new entry at the front of the collection (most-recent-first)
    /// and persists the full collection.
    ///
    /// An id already present in the collection is rejected outright; the
    /// collection is left untouched and nothing is written.
    pub async fn create(&mut self, entry: VideoEntry) -> Result<(), CatalogError> {
        if self.videos.iter().any(|v| v.id == entry.id) {
            return Err(CatalogError::DuplicateId(entry.id));
        }
        self.videos.insert(0, entry);
        self.persist().await
    }

    /// Replaces, in place, the first entry whose id matches.
    ///
    /// This is a whole-entry replacement, never a field-level merge.
    /// Returns `false` without touching memory or storage when no id
    /// matches.
    pub async fn update(&mut self, entry: VideoEntry) -> Result<bool, CatalogError> {
        match self.videos.iter().position(|v| v.id == entry.id) {
            Some(index) => {
                self.videos[index] = entry;
                self.persist().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes every entry with the given id. Idempotent: a second call
    /// with the same id is a no-op and nothing is rewritten.
    pub async fn delete(&mut self, id: &str) -> Result<bool, CatalogError> {
        let before = self.videos.len();
        self.videos.retain(|v| v.id != id);
        if self.videos.len() == before {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    /// Attempts to authenticate the shared admin session.
    ///
    /// On success the flag is set and the durable session record written;
    /// on failure all state is left exactly as it was. There is no lockout
    /// and no rate limiting.
    pub async fn login(&mut self, credential: &str) -> Result<bool, CatalogError> {
        if !self.verifier.verify(credential).await? {
            return Ok(false);
        }
        self.is_admin = true;
        self.storage.save_session().await?;
        Ok(true)
    }

    /// Clears the admin session and removes its durable record.
    pub async fn logout(&mut self) -> Result<(), CatalogError> {
        self.is_admin = false;
        self.storage.clear_session().await?;
        Ok(())
    }

    async fn persist(&self) -> Result<(), CatalogError> {
        self.storage.save_catalog(&self.videos).await?;
        Ok(())
    }
}

//=========================================================================================
// Seed Catalog
//=========================================================================================

/// The fixed collection used when no (usable) catalog record exists yet.
fn seed_catalog() -> Vec<VideoEntry> {
    vec![
        VideoDraft {
            title: "Cinematic Mountain Heights".to_string(),
            description: "Breathtaking 4K footage of the Swiss Alps at sunrise.".to_string(),
            thumbnail_url: "https://picsum.photos/seed/mountain/800/450".to_string(),
            video_url:
                "https://storage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4"
                    .to_string(),
            duration: "9:56".to_string(),
            category: "Nature".to_string(),
            tags: vec!["nature".to_string(), "4k".to_string(), "cinematic".to_string()],
            is_downloadable: true,
            quality_options: vec![VideoQuality::Q720p, VideoQuality::Q1080p],
        }
        .into_entry("1".to_string(), Utc::now()),
        VideoDraft {
            title: "The Future of Motion Design".to_string(),
            description: "Exploring how AI is changing the landscape of digital animation."
                .to_string(),
            thumbnail_url: "https://picsum.photos/seed/design/800/450".to_string(),
            video_url:
                "https://storage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4"
                    .to_string(),
            duration: "10:53".to_string(),
            category: "Technology".to_string(),
            tags: vec!["tech".to_string(), "design".to_string(), "future".to_string()],
            is_downloadable: false,
            quality_options: vec![VideoQuality::Q480p, VideoQuality::Q720p],
        }
        .into_entry("2".to_string(), Utc::now()),
    ]
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory stand-in for the persistence port.
    struct MemoryStorage {
        catalog: Mutex<CatalogLoad>,
        session: Mutex<Option<String>>,
        fail_saves: AtomicBool,
    }

    impl MemoryStorage {
        fn new(initial: CatalogLoad) -> Arc<Self> {
            Arc::new(Self {
                catalog: Mutex::new(initial),
                session: Mutex::new(None),
                fail_saves: AtomicBool::new(false),
            })
        }

        fn saved_catalog(&self) -> Option<Vec<VideoEntry>> {
            match &*self.catalog.lock().unwrap() {
                CatalogLoad::Loaded(entries) => Some(entries.clone()),
                _ => None,
            }
        }

        fn session_record(&self) -> Option<String> {
            self.session.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StorageService for MemoryStorage {
        async fn load_catalog(&self) -> PortResult<CatalogLoad> {
            Ok(self.catalog.lock().unwrap().clone())
        }

        async fn save_catalog(&self, entries: &[VideoEntry]) -> PortResult<()> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(PortError::Unexpected("storage quota exceeded".to_string()));
            }
            *self.catalog.lock().unwrap() = CatalogLoad::Loaded(entries.to_vec());
            Ok(())
        }

        async fn load_session(&self) -> PortResult<bool> {
            Ok(self.session.lock().unwrap().as_deref() == Some("true"))
        }

        async fn save_session(&self) -> PortResult<()> {
            *self.session.lock().unwrap() = Some("true".to_string());
            Ok(())
        }

        async fn clear_session(&self) -> PortResult<()> {
            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }

    struct StaticVerifier {
        secret: &'static str,
    }

    #[async_trait]
    impl CredentialVerifier for StaticVerifier {
        async fn verify(&self, credential: &str) -> PortResult<bool> {
            Ok(credential == self.secret)
        }
    }

    async fn open_with(
        initial: CatalogLoad,
    ) -> (CatalogStore, CatalogBootstrap, Arc<MemoryStorage>) {
        let storage = MemoryStorage::new(initial);
        let verifier = Arc::new(StaticVerifier { secret: "admin123" });
        let (store, bootstrap) = CatalogStore::open(storage.clone(), verifier)
            .await
            .expect("open should succeed");
        (store, bootstrap, storage)
    }

    fn sample_entry(id: &str, title: &str) -> VideoEntry {
        VideoDraft {
            title: title.to_string(),
            description: format!("{title} description"),
            thumbnail_url: "https://example.com/thumb.jpg".to_string(),
            video_url: "https://example.com/video.mp4".to_string(),
            duration: "3:21".to_string(),
            category: "Test".to_string(),
            tags: vec!["one".to_string(), "two".to_string()],
            is_downloadable: false,
            quality_options: vec![VideoQuality::Q720p],
        }
        .into_entry(id.to_string(), Utc::now())
    }

    fn ids(store: &CatalogStore) -> Vec<&str> {
        store.videos().iter().map(|v| v.id.as_str()).collect()
    }

    #[tokio::test]
    async fn empty_storage_falls_back_to_seed() {
        let (store, bootstrap, _) = open_with(CatalogLoad::Empty).await;
        assert_eq!(bootstrap, CatalogBootstrap::Seeded);
        assert_eq!(ids(&store), vec!["1", "2"]);
        assert!(!store.is_admin());
    }

    #[tokio::test]
    async fn corrupt_storage_falls_back_to_seed() {
        let (store, bootstrap, _) =
            open_with(CatalogLoad::Corrupt("bad json".to_string())).await;
        assert_eq!(
            bootstrap,
            CatalogBootstrap::SeededAfterCorruption("bad json".to_string())
        );
        assert_eq!(ids(&store), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn restored_catalog_is_used_verbatim() {
        let persisted = vec![sample_entry("a", "A"), sample_entry("b", "B")];
        let (store, bootstrap, _) = open_with(CatalogLoad::Loaded(persisted.clone())).await;
        assert_eq!(bootstrap, CatalogBootstrap::Restored(2));
        assert_eq!(store.videos(), persisted.as_slice());
    }

    #[tokio::test]
    async fn create_keeps_most_recent_first() {
        let (mut store, _, storage) = open_with(CatalogLoad::Empty).await;

        store.create(sample_entry("3", "Newest")).await.unwrap();
        assert_eq!(ids(&store), vec!["3", "1", "2"]);

        // The full collection is mirrored to storage on every mutation.
        let saved = storage.saved_catalog().unwrap();
        assert_eq!(saved, store.videos());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let (mut store, _, storage) = open_with(CatalogLoad::Empty).await;

        let err = store.create(sample_entry("1", "Impostor")).await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "1"));
        assert_eq!(ids(&store), vec!["1", "2"]);
        assert!(storage.saved_catalog().is_none());
    }

    #[tokio::test]
    async fn update_replaces_whole_entry_in_place() {
        let (mut store, _, _) = open_with(CatalogLoad::Empty).await;

        let replacement = sample_entry("2", "Rewritten");
        let replaced = store.update(replacement.clone()).await.unwrap();

        assert!(replaced);
        assert_eq!(ids(&store), vec!["1", "2"]);
        // Position preserved, every field taken from the replacement.
        assert_eq!(store.videos()[1], replacement);
    }

    #[tokio::test]
    async fn update_without_match_is_a_noop() {
        let (mut store, _, storage) = open_with(CatalogLoad::Empty).await;
        let before = store.videos().to_vec();

        let replaced = store.update(sample_entry("missing", "Ghost")).await.unwrap();

        assert!(!replaced);
        assert_eq!(store.videos(), before.as_slice());
        assert!(storage.saved_catalog().is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (mut store, _, _) = open_with(CatalogLoad::Empty).await;

        assert!(store.delete("1").await.unwrap());
        let after_first = store.videos().to_vec();

        assert!(!store.delete("1").await.unwrap());
        assert_eq!(store.videos(), after_first.as_slice());
        assert_eq!(ids(&store), vec!["2"]);
    }

    #[tokio::test]
    async fn login_gate_and_logout() {
        let (mut store, _, storage) = open_with(CatalogLoad::Empty).await;

        assert!(!store.login("letmein").await.unwrap());
        assert!(!store.is_admin());
        assert_eq!(storage.session_record(), None);

        assert!(store.login("admin123").await.unwrap());
        assert!(store.is_admin());
        assert_eq!(storage.session_record(), Some("true".to_string()));

        store.logout().await.unwrap();
        assert!(!store.is_admin());
        assert_eq!(storage.session_record(), None);
    }

    #[tokio::test]
    async fn session_is_restored_from_storage() {
        let storage = MemoryStorage::new(CatalogLoad::Empty);
        storage.save_session().await.unwrap();
        let verifier = Arc::new(StaticVerifier { secret: "admin123" });

        let (store, _) = CatalogStore::open(storage, verifier).await.unwrap();
        assert!(store.is_admin());
    }

    #[tokio::test]
    async fn failed_save_surfaces_to_the_caller() {
        let (mut store, _, storage) = open_with(CatalogLoad::Empty).await;
        storage.fail_saves.store(true, Ordering::SeqCst);

        let err = store.create(sample_entry("3", "Unsaved")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Port(PortError::Unexpected(_))));
    }

    /// The end-to-end scenario: seed [1,2] -> create 3 -> delete 1 -> update 3.
    #[tokio::test]
    async fn admin_editing_scenario() {
        let (mut store, _, _) = open_with(CatalogLoad::Empty).await;

        store.create(sample_entry("3", "X")).await.unwrap();
        assert_eq!(ids(&store), vec!["3", "1", "2"]);

        store.delete("1").await.unwrap();
        assert_eq!(ids(&store), vec!["3", "2"]);

        let mut renamed = sample_entry("3", "Y");
        renamed.views = 7;
        store.update(renamed).await.unwrap();
        assert_eq!(ids(&store), vec!["3", "2"]);
        assert_eq!(store.videos()[0].title, "Y");
        assert_eq!(store.videos()[0].views, 7);
    }
}
