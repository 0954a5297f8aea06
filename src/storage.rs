//! Local persistence for Serenya
//!
//! A small file-backed key/value layer standing in for browser local
//! storage: one JSON record per progress key, plus the saved-items list
//! under a single fixed key. Everything here is best-effort scratch state;
//! losing it never affects playback correctness.

use anyhow::Result;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{MediaType, PlaybackRequest, ProgressRecord, SavedItem};

/// File name for the saved-items list (the single fixed key)
const SAVED_ITEMS_FILE: &str = "saved.json";

/// Data directory (~/.local/share/serenya or platform equivalent)
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("serenya"))
}

/// Current Unix timestamp in milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// =============================================================================
// Progress Store
// =============================================================================

/// Per-content playback progress records
#[derive(Debug, Clone)]
pub struct ProgressStore {
    dir: PathBuf,
}

impl ProgressStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the default data directory, or None if the platform has
    /// no data dir
    pub fn open_default() -> Option<Self> {
        data_dir().map(|p| Self::new(p.join("progress")))
    }

    /// Storage key for a request: `movie_progress_<id>` for movies,
    /// `tv_progress_<id>_s<season>e<episode>` for series
    pub fn key_for(request: &PlaybackRequest) -> String {
        match request.media_type {
            MediaType::Movie => format!("movie_progress_{}", request.content_id),
            MediaType::Tv => format!(
                "tv_progress_{}_s{}e{}",
                request.content_id, request.season, request.episode
            ),
        }
    }

    fn path_for(&self, request: &PlaybackRequest) -> PathBuf {
        self.dir.join(format!("{}.json", Self::key_for(request)))
    }

    /// Write a progress record; last writer wins
    pub fn save(&self, request: &PlaybackRequest, record: &ProgressRecord) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(self.path_for(request), json)?;
        Ok(())
    }

    /// Read the record for a request, if any; unreadable records count as
    /// absent
    pub fn load(&self, request: &PlaybackRequest) -> Option<ProgressRecord> {
        let raw = std::fs::read_to_string(self.path_for(request)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// Drop the record for a request, if any
    pub fn clear(&self, request: &PlaybackRequest) -> Result<()> {
        let path = self.path_for(request);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// =============================================================================
// Saved Items
// =============================================================================

/// The user's saved-items list, a JSON array under one fixed key
#[derive(Debug, Clone)]
pub struct Library {
    path: PathBuf,
}

impl Library {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Option<Self> {
        data_dir().map(|p| Self::new(p.join(SAVED_ITEMS_FILE)))
    }

    /// All saved items; a missing or corrupt file reads as empty
    pub fn list(&self) -> Vec<SavedItem> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Save an item. Returns false (and leaves the list untouched) if an
    /// item with the same id is already present.
    pub fn add(&self, item: SavedItem) -> Result<bool> {
        let mut items = self.list();
        if items.iter().any(|i| i.id == item.id) {
            return Ok(false);
        }
        items.push(item);
        self.write(&items)?;
        Ok(true)
    }

    /// Remove an item by id. Returns false if it was not present.
    pub fn remove(&self, id: u64) -> Result<bool> {
        let mut items = self.list();
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.write(&items)?;
        Ok(true)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.list().iter().any(|i| i.id == id)
    }

    fn write(&self, items: &[SavedItem]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
