//! TMDB (The Movie Database) API client
//!
//! Provides search, trending, discover, and metadata for movies and TV
//! shows. API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    Episode, MediaType, MovieDetail, Page, SearchResult, SeasonSummary, TvDetail,
};

/// TMDB genre id for animation
const ANIME_GENRE_ID: u32 = 16;

/// Original language filter for the anime catalog
const ANIME_LANGUAGE: &str = "ja";

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.themoviedb.org/3")
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
        }
    }

    /// Make a GET request with the api key appended, retrying rate limits
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}{}api_key={}",
            self.base_url, endpoint, sep, self.api_key
        );
        let mut retries = 0;

        loop {
            let response = self
                .client
                .get(&url)
                .header("Accept", "application/json")
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    let parsed: T = serde_json::from_str(&body).map_err(|e| {
                        TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                    })?;
                    return Ok(parsed);
                }
                StatusCode::NOT_FOUND => {
                    return Err(TmdbError::NotFound.into());
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(TmdbError::RateLimited.into());
                    }

                    // Get Retry-After header or default to exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(TmdbError::ServerError(status.as_u16()).into());
                }
            }
        }
    }

    /// Search movies by title
    pub async fn search_movies(&self, query: &str, page: u32) -> Result<Page<SearchResult>> {
        let endpoint = format!(
            "/search/movie?query={}&page={}",
            urlencoding::encode(query),
            page.max(1)
        );
        let response: PageRaw = self.get(&endpoint).await?;
        Ok(response.into_page(Some(MediaType::Movie)))
    }

    /// Search TV shows by title
    pub async fn search_tv(&self, query: &str, page: u32) -> Result<Page<SearchResult>> {
        let endpoint = format!(
            "/search/tv?query={}&page={}",
            urlencoding::encode(query),
            page.max(1)
        );
        let response: PageRaw = self.get(&endpoint).await?;
        Ok(response.into_page(Some(MediaType::Tv)))
    }

    /// Search the anime catalog: a TV search filtered client-side to the
    /// animation genre with Japanese original language
    pub async fn search_anime(&self, query: &str, page: u32) -> Result<Page<SearchResult>> {
        let endpoint = format!(
            "/search/tv?query={}&page={}",
            urlencoding::encode(query),
            page.max(1)
        );
        let mut response: PageRaw = self.get(&endpoint).await?;
        response.results.retain(SearchResultRaw::is_anime);
        Ok(response.into_page(Some(MediaType::Tv)))
    }

    /// Get trending content; `window` is "day" or "week"
    pub async fn trending(&self, window: &str) -> Result<Page<SearchResult>> {
        let endpoint = format!("/trending/all/{}", window);
        let response: PageRaw = self.get(&endpoint).await?;
        Ok(response.into_page(None))
    }

    /// Discover the anime catalog, sorted by popularity
    pub async fn discover_anime(&self, page: u32) -> Result<Page<SearchResult>> {
        let endpoint = format!(
            "/discover/tv?page={}&with_genres={}&with_original_language={}&sort_by=popularity.desc",
            page.max(1),
            ANIME_GENRE_ID,
            ANIME_LANGUAGE
        );
        let response: PageRaw = self.get(&endpoint).await?;
        Ok(response.into_page(Some(MediaType::Tv)))
    }

    /// Get movie details by TMDB id, including the IMDb id
    pub async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
        let endpoint = format!("/movie/{}?append_to_response=external_ids", id);
        let response: MovieResponse = self.get(&endpoint).await?;
        Ok(response.into_detail())
    }

    /// Get TV show details by TMDB id, including season summaries
    pub async fn tv_detail(&self, id: u64) -> Result<TvDetail> {
        let endpoint = format!("/tv/{}?append_to_response=external_ids", id);
        let response: TvResponse = self.get(&endpoint).await?;
        Ok(response.into_detail())
    }

    /// Get episodes for a TV season
    pub async fn tv_season(&self, id: u64, season: u32) -> Result<Vec<Episode>> {
        let endpoint = format!("/tv/{}/season/{}", id, season);
        let response: SeasonResponse = self.get(&endpoint).await?;
        Ok(response.into_episodes(season))
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct PageRaw {
    #[serde(default)]
    page: u32,
    results: Vec<SearchResultRaw>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

impl PageRaw {
    /// Convert to the public page shape. `default_type` supplies the media
    /// type for endpoints whose results omit it (movie/TV-scoped searches).
    fn into_page(self, default_type: Option<MediaType>) -> Page<SearchResult> {
        Page {
            page: self.page.max(1),
            results: self
                .results
                .into_iter()
                .filter_map(|r| r.into_search_result(default_type))
                .collect(),
            total_pages: self.total_pages.max(1),
            total_results: self.total_results,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResultRaw {
    id: u64,
    media_type: Option<String>,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    original_language: Option<String>,
}

impl SearchResultRaw {
    fn is_anime(&self) -> bool {
        self.genre_ids.contains(&ANIME_GENRE_ID)
            && self.original_language.as_deref() == Some(ANIME_LANGUAGE)
    }

    fn into_search_result(self, default_type: Option<MediaType>) -> Option<SearchResult> {
        let media_type = match self.media_type.as_deref() {
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            Some(_) => return None, // Filter out "person" and other types
            None => default_type?,
        };

        let title = self.title.or(self.name).unwrap_or_default();
        let date_str = self.release_date.or(self.first_air_date);
        let year = date_str.and_then(|d| extract_year(&d));

        Some(SearchResult {
            id: self.id,
            media_type,
            title,
            year,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average.unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    id: u64,
    imdb_id: Option<String>,
    title: String,
    release_date: Option<String>,
    runtime: Option<u32>,
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    external_ids: Option<ExternalIds>,
}

impl MovieResponse {
    fn into_detail(self) -> MovieDetail {
        let year = self
            .release_date
            .as_ref()
            .and_then(|d| extract_year(d))
            .unwrap_or(0);

        let imdb_id = self
            .imdb_id
            .or(self.external_ids.and_then(|e| e.imdb_id))
            .filter(|s| !s.is_empty());

        MovieDetail {
            id: self.id,
            imdb_id,
            title: self.title,
            year,
            runtime: self.runtime.unwrap_or(0),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TvResponse {
    id: u64,
    name: String,
    first_air_date: Option<String>,
    seasons: Vec<SeasonRaw>,
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    external_ids: Option<ExternalIds>,
}

impl TvResponse {
    fn into_detail(self) -> TvDetail {
        let year = self
            .first_air_date
            .as_ref()
            .and_then(|d| extract_year(d))
            .unwrap_or(0);

        let imdb_id = self
            .external_ids
            .and_then(|e| e.imdb_id)
            .filter(|s| !s.is_empty());

        // Filter out specials (season 0)
        let seasons: Vec<SeasonSummary> = self
            .seasons
            .into_iter()
            .filter(|s| s.season_number > 0)
            .map(|s| s.into_summary())
            .collect();

        TvDetail {
            id: self.id,
            imdb_id,
            name: self.name,
            year,
            seasons,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    episodes: Vec<EpisodeRaw>,
}

impl SeasonResponse {
    fn into_episodes(self, season: u32) -> Vec<Episode> {
        self.episodes
            .into_iter()
            .map(|e| e.into_episode(season))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SeasonRaw {
    season_number: u32,
    episode_count: u32,
    name: Option<String>,
    air_date: Option<String>,
}

impl SeasonRaw {
    fn into_summary(self) -> SeasonSummary {
        SeasonSummary {
            season_number: self.season_number,
            episode_count: self.episode_count,
            name: self.name,
            air_date: self.air_date,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeRaw {
    episode_number: u32,
    name: String,
    overview: Option<String>,
    runtime: Option<u32>,
}

impl EpisodeRaw {
    fn into_episode(self, season: u32) -> Episode {
        Episode {
            season,
            episode: self.episode_number,
            name: self.name,
            overview: self.overview.unwrap_or_default(),
            runtime: self.runtime,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    imdb_id: Option<String>,
}

/// Extract year from a date string like "2022-03-04"
fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|s| s.parse().ok())
}
