//! Configuration management for Serenya
//!
//! Handles config file loading/saving, API key management, and embed/image
//! base URL overrides. Config is stored at ~/.config/serenya/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::player::MirrorRegistry;

/// Bundled TMDB API keys (from freekeys pool)
const TMDB_KEY_POOL: &[&str] = &[
    "fb7bb23f03b6994dafc674c074d01761",
    "e55425032d3d0f371fc776f302e7c09b",
    "8301a21598f8b45668d5711a814f01f6",
    "8cf43ad9c085135b9479ad5cf6bbcbda",
    "da63548086e399ffc910fbc08526df05",
    "13e53ff644a8bd4ba37b3e1044ad24f3",
    "269890f657dddf4635473cf4cf456576",
    "a2f888b27315e62e471b2d587048f32e",
    "8476a7ab80ad76f0936744df0430e67c",
    "5622cafbfe8f8cfe358a29c53e19bba0",
];

/// Default image CDN base, composed with a size token and the path fragment
/// returned by the metadata provider
const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Default poster size token
const DEFAULT_POSTER_SIZE: &str = "w500";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cached TMDB API key
    pub tmdb_api_key: Option<String>,
    /// Image CDN base URL override
    pub image_base_url: Option<String>,
    /// Poster size token override (w185, w500, original, ...)
    pub poster_size: Option<String>,
    /// Embed base URL overrides, keyed by mirror id
    pub mirror_urls: Option<HashMap<String, String>>,
}

impl Config {
    /// Get config file path (~/.config/serenya/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("serenya").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Get TMDB API key with fallback chain:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Cached key from config file
    /// 3. Random key from bundled pool (and cache it)
    pub fn get_tmdb_api_key(&mut self) -> String {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            return key;
        }

        if let Some(ref key) = self.tmdb_api_key {
            return key.clone();
        }

        let key = Self::random_pool_key();
        self.tmdb_api_key = Some(key.clone());
        let _ = self.save(); // Best effort save
        key
    }

    /// Get a random key from the bundled pool
    pub fn random_pool_key() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as usize)
            .unwrap_or(0);
        let idx = seed % TMDB_KEY_POOL.len();
        TMDB_KEY_POOL[idx].to_string()
    }

    /// Compose a full image URL from a provider path fragment
    /// (e.g. "/74xTEgt7R36Fpooo50r9T25onhq.jpg")
    pub fn image_url(&self, path: &str) -> String {
        let base = self.image_base_url.as_deref().unwrap_or(DEFAULT_IMAGE_BASE);
        let size = self.poster_size.as_deref().unwrap_or(DEFAULT_POSTER_SIZE);
        format!("{}/{}{}", base.trim_end_matches('/'), size, path)
    }

    /// Build the mirror registry with any configured base URL overrides
    /// applied
    pub fn mirror_registry(&self) -> MirrorRegistry {
        let mut registry = MirrorRegistry::builtin();
        if let Some(urls) = &self.mirror_urls {
            for (id, url) in urls {
                registry.override_base_url(id, url);
            }
        }
        registry
    }
}
