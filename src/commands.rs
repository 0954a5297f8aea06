//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the appropriate backend services.
//! Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;

use crate::api::TmdbClient;
use crate::cli::{
    AnimeCmd, CatalogFilter, ExitCode, InfoCmd, MirrorsCmd, Output, PlayCmd, ProgressCmd,
    SavedAction, SavedAddCmd, SavedCmd, SavedRemoveCmd, SearchCmd, TrendingCmd, UrlCmd,
};
use crate::config::Config;
use crate::models::{MediaType, SavedItem};
use crate::player::{BrowserFrame, EmbedFrame, PlayerError, PlayerSession};
use crate::storage::{Library, ProgressStore};

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, output: &Output) -> ExitCode {
    let mut config = Config::load();
    let api_key = config.get_tmdb_api_key();
    let client = TmdbClient::new(api_key);

    output.info(format!("Searching for: {}", cmd.query));

    let result = match cmd.media_type {
        CatalogFilter::Movie => client.search_movies(&cmd.query, cmd.page).await,
        CatalogFilter::Tv => client.search_tv(&cmd.query, cmd.page).await,
        CatalogFilter::Anime => client.search_anime(&cmd.query, cmd.page).await,
    };

    match result {
        Ok(mut page) => {
            page.results.truncate(cmd.limit);
            if let Err(e) = output.print(&page) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Search failed: {}", e), ExitCode::NetworkError),
    }
}

// =============================================================================
// Trending Command
// =============================================================================

pub async fn trending_cmd(cmd: TrendingCmd, output: &Output) -> ExitCode {
    let mut config = Config::load();
    let api_key = config.get_tmdb_api_key();
    let client = TmdbClient::new(api_key);

    output.info(format!("Fetching trending ({})...", cmd.window.as_str()));

    match client.trending(cmd.window.as_str()).await {
        Ok(mut page) => {
            page.results.truncate(cmd.limit);
            if let Err(e) = output.print(&page) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(
            format!("Trending fetch failed: {}", e),
            ExitCode::NetworkError,
        ),
    }
}

// =============================================================================
// Anime Command
// =============================================================================

pub async fn anime_cmd(cmd: AnimeCmd, output: &Output) -> ExitCode {
    let mut config = Config::load();
    let api_key = config.get_tmdb_api_key();
    let client = TmdbClient::new(api_key);

    output.info(format!("Fetching anime catalog (page {})...", cmd.page));

    match client.discover_anime(cmd.page).await {
        Ok(mut page) => {
            page.results.truncate(cmd.limit);
            if let Err(e) = output.print(&page) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Anime fetch failed: {}", e), ExitCode::NetworkError),
    }
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, output: &Output) -> ExitCode {
    let mut config = Config::load();
    let api_key = config.get_tmdb_api_key();
    let client = TmdbClient::new(api_key);

    output.info(format!("Getting info for: {}", cmd.id));

    match cmd.media_type {
        CatalogFilter::Movie => match client.movie_detail(cmd.id).await {
            Ok(detail) => {
                if let Err(e) = output.print(&detail) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                ExitCode::Success
            }
            Err(e) => output.error(format!("Movie info failed: {}", e), ExitCode::NetworkError),
        },
        // Anime is a TV subset, so both resolve through the TV endpoint
        CatalogFilter::Tv | CatalogFilter::Anime => match client.tv_detail(cmd.id).await {
            Ok(detail) => {
                if let Err(e) = output.print(&detail) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                ExitCode::Success
            }
            Err(e) => output.error(format!("TV info failed: {}", e), ExitCode::NetworkError),
        },
    }
}

// =============================================================================
// Mirrors Command
// =============================================================================

#[derive(Debug, Serialize)]
struct MirrorRow {
    id: &'static str,
    name: &'static str,
    priority: u8,
}

pub async fn mirrors_cmd(_cmd: MirrorsCmd, output: &Output) -> ExitCode {
    let config = Config::load();
    let registry = config.mirror_registry();

    let rows: Vec<MirrorRow> = registry
        .by_priority()
        .iter()
        .map(|m| MirrorRow {
            id: m.id,
            name: m.display_name,
            priority: m.priority,
        })
        .collect();

    if let Err(e) = output.print(&rows) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Url Command
// =============================================================================

#[derive(Debug, Serialize)]
struct MirrorUrl {
    mirror: &'static str,
    url: String,
}

pub async fn url_cmd(cmd: UrlCmd, output: &Output) -> ExitCode {
    let config = Config::load();
    let registry = config.mirror_registry();

    let request = match cmd.target.route_params().into_request() {
        Ok(request) => request,
        Err(e) => return output.error(e.to_string(), ExitCode::CannotPlay),
    };

    let urls: Vec<MirrorUrl> = registry
        .by_priority()
        .iter()
        .filter(|m| cmd.mirror.as_deref().map(|id| m.id == id).unwrap_or(true))
        .map(|m| MirrorUrl {
            mirror: m.id,
            url: m.build_url(&request),
        })
        .collect();

    if urls.is_empty() {
        return output.error(
            format!("Unknown mirror: {}", cmd.mirror.as_deref().unwrap_or("?")),
            ExitCode::InvalidArgs,
        );
    }

    if let Err(e) = output.print(&urls) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Play Command
// =============================================================================

#[derive(Debug, Serialize)]
struct PlayReport {
    mirror: &'static str,
    url: String,
    opened: bool,
}

pub async fn play_cmd(cmd: PlayCmd, output: &Output) -> ExitCode {
    let config = Config::load();
    let registry = config.mirror_registry();

    let mut session = match PlayerSession::from_route(registry, cmd.target.route_params()) {
        Ok(session) => session,
        Err(e @ PlayerError::CannotPlay) => return output.error(e.to_string(), ExitCode::CannotPlay),
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    if let Some(store) = ProgressStore::open_default() {
        session = session.with_progress_store(store);
    }

    if let Some(id) = cmd.mirror.as_deref() {
        match session.registry().position(id) {
            Some(index) => session.select_mirror(index),
            None => return output.error(format!("Unknown mirror: {}", id), ExitCode::InvalidArgs),
        }
    }

    let mirror = session.current_mirror().id;
    let url = session.current_url();

    if let Some(progress) = session.stored_progress() {
        output.info(format!(
            "Resuming around {:.0}% ({:.0}s of {:.0}s)",
            progress.fraction() * 100.0,
            progress.current_time,
            progress.duration
        ));
    }

    let opened = if cmd.no_open {
        false
    } else {
        output.info(format!("Opening {} on {}...", session.request(), mirror));
        let mut frame = BrowserFrame::new();
        if let Err(e) = frame.set_url(&url) {
            session.report_failure();
            return output.error(
                format!("Could not open embed: {} (try --no-open or -m)", e),
                ExitCode::OpenFailed,
            );
        }
        true
    };

    let report = PlayReport {
        mirror,
        url,
        opened,
    };
    if let Err(e) = output.print(&report) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Saved Command
// =============================================================================

pub async fn saved_cmd(cmd: SavedCmd, output: &Output) -> ExitCode {
    let Some(library) = Library::open_default() else {
        return output.error("No data directory available", ExitCode::Error);
    };

    match cmd.action {
        SavedAction::List => {
            let items = library.list();
            if let Err(e) = output.print(&items) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        SavedAction::Add(add) => saved_add(add, &library, output),
        SavedAction::Remove(remove) => saved_remove(remove, &library, output),
    }
}

fn saved_add(cmd: SavedAddCmd, library: &Library, output: &Output) -> ExitCode {
    let item = SavedItem {
        id: cmd.id,
        media_type: if cmd.tv { MediaType::Tv } else { MediaType::Movie },
        title: cmd.title,
        year: cmd.year,
        poster_path: cmd.poster_path,
        vote_average: cmd.rating,
    };

    match library.add(item) {
        Ok(true) => {
            output.info("Saved.");
            ExitCode::Success
        }
        Ok(false) => {
            output.info("Already saved.");
            ExitCode::Success
        }
        Err(e) => output.error(format!("Save failed: {}", e), ExitCode::Error),
    }
}

fn saved_remove(cmd: SavedRemoveCmd, library: &Library, output: &Output) -> ExitCode {
    match library.remove(cmd.id) {
        Ok(true) => {
            output.info("Removed.");
            ExitCode::Success
        }
        Ok(false) => output.error(format!("Not in saved list: {}", cmd.id), ExitCode::Error),
        Err(e) => output.error(format!("Remove failed: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Progress Command
// =============================================================================

pub async fn progress_cmd(cmd: ProgressCmd, output: &Output) -> ExitCode {
    let request = match cmd.target.route_params().into_request() {
        Ok(request) => request,
        Err(e) => return output.error(e.to_string(), ExitCode::CannotPlay),
    };

    let Some(store) = ProgressStore::open_default() else {
        return output.error("No data directory available", ExitCode::Error);
    };

    match store.load(&request) {
        Some(record) => {
            if let Err(e) = output.print(&record) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        None => output.error(format!("No progress stored for {}", request), ExitCode::Error),
    }
}
