//! Player session controller
//!
//! Drives playback of one piece of content across the mirror registry:
//! tracks the current mirror, observes frame failures, and exposes
//! deterministic mirror advancement. One session lives exactly as long as
//! the player screen; nothing here persists across sessions except the
//! best-effort progress records.

use thiserror::Error;

use crate::models::{PlaybackRequest, ProgressRecord};
use crate::player::frame::{FrameEvent, PlayerMessage};
use crate::player::mirrors::{MirrorDescriptor, MirrorRegistry};
use crate::storage::{now_millis, ProgressStore};

/// Errors that prevent a session from being created at all.
///
/// These are precondition failures, distinct from a mirror load failure: no
/// frame is ever rendered for them, and the only recovery is navigating
/// away.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlayerError {
    #[error("cannot play: missing or invalid content id")]
    CannotPlay,

    #[error("cannot play: no mirrors registered")]
    NoMirrors,
}

// =============================================================================
// Route Parameters
// =============================================================================

/// Route-style parameters identifying the content to play, as handed over by
/// a detail view: `id`, `imdbId`, `title` (percent-encoded), `type` (`"tv"`
/// selects series mode), `season`, `episode`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteParams {
    pub id: Option<String>,
    pub imdb_id: Option<String>,
    pub title: Option<String>,
    pub media_type: Option<String>,
    pub season: Option<String>,
    pub episode: Option<String>,
}

impl RouteParams {
    /// Validate the parameters into a playback request.
    ///
    /// A missing or non-numeric `id` is the "cannot play" precondition
    /// failure. `type` values other than `"tv"` select movie mode; absent or
    /// unparsable season/episode default to 1.
    pub fn into_request(self) -> Result<PlaybackRequest, PlayerError> {
        let content_id = self
            .id
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .ok_or(PlayerError::CannotPlay)?;

        let series = self.media_type.as_deref() == Some("tv");
        let season = parse_or_one(self.season.as_deref());
        let episode = parse_or_one(self.episode.as_deref());

        let mut request = if series {
            PlaybackRequest::series(content_id, season, episode)
        } else {
            PlaybackRequest::movie(content_id)
        };

        if let Some(imdb_id) = self.imdb_id.filter(|s| !s.trim().is_empty()) {
            request = request.with_imdb_id(imdb_id.trim());
        }
        if let Some(title) = self.title.filter(|s| !s.is_empty()) {
            let decoded = match urlencoding::decode(&title) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => title,
            };
            request = request.with_title(decoded);
        }

        Ok(request)
    }
}

fn parse_or_one(value: Option<&str>) -> u32 {
    value
        .and_then(|s| s.trim().parse::<u32>().ok())
        .map(|n| n.max(1))
        .unwrap_or(1)
}

// =============================================================================
// Session
// =============================================================================

/// State machine for a single playback session.
///
/// Invariant: `0 <= mirror_index < registry.len()`. `has_error` resets on
/// any mirror or request change. Cycling past the last mirror wraps to the
/// first; there is deliberately no "all mirrors exhausted" state, since a
/// dead mirror is indistinguishable from a transiently down one.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    registry: MirrorRegistry,
    request: PlaybackRequest,
    mirror_index: usize,
    has_error: bool,
    selector_open: bool,
    progress: Option<ProgressStore>,
}

impl PlayerSession {
    /// Create a session starting at the highest-priority mirror
    pub fn new(registry: MirrorRegistry, request: PlaybackRequest) -> Result<Self, PlayerError> {
        if registry.is_empty() {
            return Err(PlayerError::NoMirrors);
        }
        Ok(Self {
            registry,
            request,
            mirror_index: 0,
            has_error: false,
            selector_open: false,
            progress: None,
        })
    }

    /// Create a session from route parameters
    pub fn from_route(registry: MirrorRegistry, params: RouteParams) -> Result<Self, PlayerError> {
        Self::new(registry, params.into_request()?)
    }

    /// Attach a progress store for persisting provider progress messages
    pub fn with_progress_store(mut self, store: ProgressStore) -> Self {
        self.progress = Some(store);
        self
    }

    pub fn request(&self) -> &PlaybackRequest {
        &self.request
    }

    pub fn registry(&self) -> &MirrorRegistry {
        &self.registry
    }

    pub fn mirror_index(&self) -> usize {
        self.mirror_index
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn selector_open(&self) -> bool {
        self.selector_open
    }

    /// The active mirror; always defined given the index invariant
    pub fn current_mirror(&self) -> &MirrorDescriptor {
        &self.registry.by_priority()[self.mirror_index]
    }

    /// The active embed URL, recomputed from the current mirror and the
    /// effective request; never cached
    pub fn current_url(&self) -> String {
        self.current_mirror().build_url(&self.request)
    }

    /// Frame reported a load failure. Idempotent; mirrors are never advanced
    /// automatically.
    pub fn report_failure(&mut self) {
        self.has_error = true;
    }

    /// Jump to a specific mirror. Out-of-range indices are ignored, guarding
    /// against a desynced selector UI.
    pub fn select_mirror(&mut self, index: usize) {
        if index < self.registry.len() {
            self.mirror_index = index;
            self.has_error = false;
            self.selector_open = false;
        }
    }

    /// Advance to the next mirror, wrapping past the end
    pub fn try_next(&mut self) {
        self.mirror_index = (self.mirror_index + 1) % self.registry.len();
        self.has_error = false;
    }

    /// Re-render the same URL without touching any state; recovers from
    /// transient blips without cycling providers
    pub fn reload(&self) -> String {
        self.current_url()
    }

    /// Switch the effective request to another episode (series only).
    /// Clears the error flag but keeps the current mirror, retrying the same
    /// provider with the new episode.
    pub fn set_episode(&mut self, season: u32, episode: u32) {
        if !self.request.is_series() {
            return;
        }
        self.request.season = season.max(1);
        self.request.episode = episode.max(1);
        self.has_error = false;
    }

    pub fn toggle_selector(&mut self) {
        self.selector_open = !self.selector_open;
    }

    pub fn close_selector(&mut self) {
        self.selector_open = false;
    }

    /// React to a frame signal: load failures flip the error flag, progress
    /// messages are persisted best-effort
    pub fn apply_event(&mut self, event: FrameEvent) {
        match event {
            FrameEvent::LoadError => self.report_failure(),
            FrameEvent::Message(message) => self.record_progress(&message),
        }
    }

    /// Last stored progress for the effective request, if any
    pub fn stored_progress(&self) -> Option<ProgressRecord> {
        self.progress.as_ref()?.load(&self.request)
    }

    fn record_progress(&self, message: &PlayerMessage) {
        let Some(store) = self.progress.as_ref() else {
            return;
        };
        let record = ProgressRecord {
            current_time: message.current_time,
            duration: message.duration,
            timestamp: now_millis(),
            mirror: self.current_mirror().id.to_string(),
        };
        // Progress telemetry is expendable; log and move on.
        if let Err(e) = store.save(&self.request, &record) {
            eprintln!("progress write failed: {}", e);
        }
    }
}
