//! Serenya - terminal front end for a mirror-backed streaming catalog
//!
//! Browse movies, series, and anime, then hand playback to third-party embed
//! mirrors with ordered fallback. The terminal picks the mirror; the system
//! browser renders it.
//!
//! # Modules
//!
//! - `models` - Data structures for catalog entries, playback requests, progress
//! - `api` - Metadata client (TMDB)
//! - `player` - Mirror registry, player session, embed frame
//! - `storage` - File-backed progress records and saved items
//! - `config` - Config file, API keys, mirror overrides
//! - `cli` / `commands` - Scriptable command surface
//! - `ui` - TUI components
//! - `app` - Application state and navigation

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod player;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use models::{
    Episode, MediaType, MovieDetail, Page, PlaybackRequest, ProgressRecord, SavedItem,
    SearchResult, TvDetail,
};

pub use api::{TmdbClient, TmdbError};
pub use app::{App, AppState};
pub use player::{
    BrowserFrame, EmbedFrame, FrameError, FrameEvent, MirrorDescriptor, MirrorRegistry,
    PlayerError, PlayerMessage, PlayerSession, Provider, RouteParams,
};
pub use storage::{Library, ProgressStore};
