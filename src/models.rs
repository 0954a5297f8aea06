//! Data structures and types for Serenya
//!
//! Contains all shared models used across the application organized by domain:
//! - **Catalog**: TMDB search results, paginated lists, and media details
//! - **Playback**: the request handed to the mirror registry and player session
//! - **Storage**: progress records and saved items persisted locally

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Catalog Models (TMDB)
// =============================================================================

/// Media type discriminator for catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
        }
    }
}

/// Paginated list shape returned by the metadata provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// Catalog entry from search, trending, or discover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<u16>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f32,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

/// Summary of a TV season (used in TvDetail)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: u32,
    pub episode_count: u32,
    pub name: Option<String>,
    pub air_date: Option<String>,
}

impl fmt::Display for SeasonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("Season");
        write!(
            f,
            "{} {} ({} episodes)",
            name, self.season_number, self.episode_count
        )
    }
}

/// Detailed movie information from TMDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub imdb_id: Option<String>,
    pub title: String,
    pub year: u16,
    pub runtime: u32,
    pub genres: Vec<String>,
    pub overview: String,
    pub vote_average: f32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.runtime / 60;
        let mins = self.runtime % 60;
        write!(
            f,
            "{} ({}) - {}h {}m - ⭐ {:.1}",
            self.title, self.year, hours, mins, self.vote_average
        )
    }
}

/// Detailed TV show information from TMDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvDetail {
    pub id: u64,
    pub imdb_id: Option<String>,
    pub name: String,
    pub year: u16,
    pub seasons: Vec<SeasonSummary>,
    pub genres: Vec<String>,
    pub overview: String,
    pub vote_average: f32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl fmt::Display for TvDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} seasons - ⭐ {:.1}",
            self.name,
            self.year,
            self.seasons.len(),
            self.vote_average
        )
    }
}

/// TV episode information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub season: u32,
    pub episode: u32,
    pub name: String,
    pub overview: String,
    pub runtime: Option<u32>,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02} - {}", self.season, self.episode, self.name)
    }
}

// =============================================================================
// Playback Models
// =============================================================================

/// Everything a mirror needs to build a playable embed URL.
///
/// Immutable for the lifetime of a player session, except that changing
/// season/episode on a series produces a new effective request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    /// TMDB content id
    pub content_id: u64,
    /// IMDb id, preferred by some mirrors over the TMDB id
    pub imdb_id: Option<String>,
    pub media_type: MediaType,
    /// Season number; meaningful for series only, always >= 1
    pub season: u32,
    /// Episode number; meaningful for series only, always >= 1
    pub episode: u32,
    /// Display title; never used for URL construction
    pub title: Option<String>,
}

impl PlaybackRequest {
    /// Request for a movie by TMDB id
    pub fn movie(content_id: u64) -> Self {
        Self {
            content_id,
            imdb_id: None,
            media_type: MediaType::Movie,
            season: 1,
            episode: 1,
            title: None,
        }
    }

    /// Request for a series episode; season/episode are clamped to >= 1
    pub fn series(content_id: u64, season: u32, episode: u32) -> Self {
        Self {
            content_id,
            imdb_id: None,
            media_type: MediaType::Tv,
            season: season.max(1),
            episode: episode.max(1),
            title: None,
        }
    }

    pub fn with_imdb_id(mut self, imdb_id: impl Into<String>) -> Self {
        self.imdb_id = Some(imdb_id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn is_series(&self) -> bool {
        self.media_type == MediaType::Tv
    }
}

impl fmt::Display for PlaybackRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title.as_deref().unwrap_or("Untitled");
        match self.media_type {
            MediaType::Movie => write!(f, "{} (#{})", title, self.content_id),
            MediaType::Tv => write!(
                f,
                "{} S{:02}E{:02} (#{})",
                title, self.season, self.episode, self.content_id
            ),
        }
    }
}

// =============================================================================
// Storage Models
// =============================================================================

/// Best-effort playback progress, persisted per content item.
///
/// Field names match the record the embed providers report, so the stored
/// JSON stays interchangeable with what a web front end would write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Playback position in seconds
    pub current_time: f64,
    /// Total duration in seconds
    pub duration: f64,
    /// Unix timestamp (milliseconds) of the last update
    pub timestamp: u64,
    /// Mirror id the progress was reported from
    pub mirror: String,
}

impl ProgressRecord {
    /// Fraction watched, 0.0 when duration is unknown
    pub fn fraction(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Entry in the user's saved-items list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItem {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<u16>,
    pub poster_path: Option<String>,
    pub vote_average: f32,
}

impl From<&SearchResult> for SavedItem {
    fn from(result: &SearchResult) -> Self {
        Self {
            id: result.id,
            media_type: result.media_type,
            title: result.title.clone(),
            year: result.year,
            poster_path: result.poster_path.clone(),
            vote_average: result.vote_average,
        }
    }
}

impl fmt::Display for SavedItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_request_clamps_to_one() {
        let req = PlaybackRequest::series(1399, 0, 0);
        assert_eq!(req.season, 1);
        assert_eq!(req.episode, 1);
    }

    #[test]
    fn test_progress_fraction() {
        let record = ProgressRecord {
            current_time: 600.0,
            duration: 1200.0,
            timestamp: 0,
            mirror: "vidsrc".into(),
        };
        assert!((record.fraction() - 0.5).abs() < f64::EPSILON);

        let unknown = ProgressRecord {
            current_time: 600.0,
            duration: 0.0,
            timestamp: 0,
            mirror: "vidsrc".into(),
        };
        assert_eq!(unknown.fraction(), 0.0);
    }

    #[test]
    fn test_display_request() {
        let req = PlaybackRequest::series(1399, 2, 5).with_title("Game of Thrones");
        assert_eq!(req.to_string(), "Game of Thrones S02E05 (#1399)");
    }
}
