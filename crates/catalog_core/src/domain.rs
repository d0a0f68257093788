//! crates/catalog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// The closed set of playback quality labels a catalog entry may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoQuality {
    Q360p,
    Q480p,
    Q720p,
    Q1080p,
}

impl VideoQuality {
    /// The canonical display label, as persisted and shown in players.
    pub fn label(&self) -> &'static str {
        match self {
            VideoQuality::Q360p => "360p",
            VideoQuality::Q480p => "480p",
            VideoQuality::Q720p => "720p",
            VideoQuality::Q1080p => "1080p",
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VideoQuality {
    type Err = UnknownQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "360p" => Ok(VideoQuality::Q360p),
            "480p" => Ok(VideoQuality::Q480p),
            "720p" => Ok(VideoQuality::Q720p),
            "1080p" => Ok(VideoQuality::Q1080p),
            other => Err(UnknownQuality(other.to_string())),
        }
    }
}

/// Error returned when a quality label is outside the closed set.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown video quality label: '{0}'")]
pub struct UnknownQuality(pub String);

/// Represents one playable video in the catalog.
///
/// `id` is opaque and immutable once assigned. `duration` is a display
/// string, never a number (no arithmetic is performed on it). `views` is
/// carried in the model but no store operation increments it.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoEntry {
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
    pub quality_options: Vec<VideoQuality>,
    pub views: u64,
}

/// The caller-facing creation payload: everything the admin supplies
/// when adding a video, before the store assigns identity and provenance.
#[derive(Debug, Clone)]
pub struct VideoDraft {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub duration: String,
    pub category: String,
    pub tags: Vec<String>,
    pub is_downloadable: bool,
    pub quality_options: Vec<VideoQuality>,
}

impl VideoDraft {
    /// Assembles a full entry from this draft.
    ///
    /// An empty `quality_options` falls back to a single default label,
    /// and `views` always starts at zero.
    pub fn into_entry(self, id: String, upload_date: DateTime<Utc>) -> VideoEntry {
        let quality_options = if self.quality_options.is_empty() {
            vec![VideoQuality::Q720p]
        } else {
            self.quality_options
        };

        VideoEntry {
            id,
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
            views: 0,
        }
    }
}

/// A transient metadata draft proposed by the suggestion service.
///
/// Never persisted and never authoritative: it only seeds a draft the
/// admin may choose to submit through the normal creation path.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSuggestion {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
}
