//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `StorageService` port from the `core` crate. It keeps the two durable
//! records (the catalog JSON array and the admin-session flag) in a single
//! SQLite key-value table using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use catalog_core::domain::{VideoEntry, VideoQuality};
use catalog_core::ports::{CatalogLoad, PortError, PortResult, StorageService};

/// Fixed key for the catalog record, a JSON array rewritten in full on every save.
const CATALOG_KEY: &str = "catalog_videos_v1";
/// Fixed key for the session record, the literal `"true"` while authenticated.
const SESSION_KEY: &str = "admin_session";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter that implements the `StorageService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn read_value(&self, key: &str) -> PortResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT value FROM app_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    async fn write_value(&self, key: &str, value: &str) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO app_state (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn delete_value(&self, key: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM app_state WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Storage Record Structs
//=========================================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoRecord {
    id: String,
    title: String,
    description: String,
    thumbnail_url: String,
    video_url: String,
    duration: String,
    category: String,
    tags: Vec<String>,
    upload_date: String,
    is_downloadable: bool,
    quality_options: Vec<String>,
    views: u64,
}

impl VideoRecord {
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
            upload_date: entry.upload_date.to_rfc3339(),
            is_downloadable: entry.is_downloadable,
            quality_options: entry
                .quality_options
                .iter()
                .map(|q| q.label().to_string())
                .collect(),
            views: entry.views,
        }
    }

    /// Converts the stored record back into the domain type. A record that
    /// decoded as JSON but fails here (unknown quality label, unreadable
    /// timestamp) counts as corruption, not as a silent default.
    fn to_domain(self) -> Result<VideoEntry, String> {
        let upload_date = DateTime::parse_from_rfc3339(&self.upload_date)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| format!("entry '{}': bad upload date: {}", self.id, e))?;

        let quality_options = self
            .quality_options
            .iter()
            .map(|label| label.parse::<VideoQuality>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("entry '{}': {}", self.id, e))?;

        Ok(VideoEntry {
            id: self.id,
            title: self.title,
            description: self.description,
            thumbnail_url: self.thumbnail_url,
            video_url: self.video_url,
            duration: self.duration,
            category: self.category,
            tags: self.tags,
            upload_date,
            is_downloadable: self.is_downloadable,
            quality_options,
            views: self.views,
        })
    }
}

//=========================================================================================
// `StorageService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StorageService for DbAdapter {
    async fn load_catalog(&self) -> PortResult<CatalogLoad> {
        let Some(raw) = self.read_value(CATALOG_KEY).await? else {
            return Ok(CatalogLoad::Empty);
        };

        let records: Vec<VideoRecord> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => return Ok(CatalogLoad::Corrupt(e.to_string())),
        };

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            match record.to_domain() {
                Ok(entry) => entries.push(entry),
                Err(reason) => return Ok(CatalogLoad::Corrupt(reason)),
            }
        }

        Ok(CatalogLoad::Loaded(entries))
    }

    async fn save_catalog(&self, entries: &[VideoEntry]) -> PortResult<()> {
        let records: Vec<VideoRecord> = entries.iter().map(VideoRecord::from_domain).collect();
        let json =
            serde_json::to_string(&records).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.write_value(CATALOG_KEY, &json).await
    }

    async fn load_session(&self) -> PortResult<bool> {
        Ok(self.read_value(SESSION_KEY).await?.as_deref() == Some("true"))
    }

    async fn save_session(&self) -> PortResult<()> {
        self.write_value(SESSION_KEY, "true").await
    }

    async fn clear_session(&self) -> PortResult<()> {
        self.delete_value(SESSION_KEY).await
    }
}

//=========================================================================================
// Tests
//=========================================================================================
