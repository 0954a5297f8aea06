//! CLI - Command Line Interface for Serenya
//!
//! Every TUI action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search for content
//! serenya search "fight club" --json
//!
//! # Inspect the mirror table and embed URLs
//! serenya mirrors
//! serenya url 550 --imdb-id tt0137523
//!
//! # Open the highest-priority mirror in the browser
//! serenya play 550 --title "Fight Club"
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::player::RouteParams;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Playback precondition failed (missing/invalid content id)
    CannotPlay = 4,
    /// Embed frame could not be opened
    OpenFailed = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Serenya - terminal front end for the Serenya streaming catalog
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "serenya",
    version,
    about = "Terminal front end for the Serenya streaming catalog",
    long_about = "Browse movies, series, and anime from the Serenya catalog and \
                  hand playback to third-party embed mirrors.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  serenya                              Launch interactive TUI\n\
                  serenya search \"fight club\"          Search for content\n\
                  serenya url 1399 --tv -s 2 -e 5      Print embed URLs for an episode\n\
                  serenya play 550 --json              Open the top mirror, JSON output"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies, TV shows, or anime
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get trending content
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Browse the anime catalog by popularity
    Anime(AnimeCmd),

    /// Get details for a movie or show
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List the playback mirror table by priority
    #[command(visible_alias = "m")]
    Mirrors(MirrorsCmd),

    /// Print embed URLs for a piece of content
    Url(UrlCmd),

    /// Open a piece of content on a playback mirror
    #[command(visible_alias = "p")]
    Play(PlayCmd),

    /// Manage the saved-items list
    Saved(SavedCmd),

    /// Show stored playback progress for a piece of content
    Progress(ProgressCmd),
}

// =============================================================================
// Catalog Commands
// =============================================================================

/// Search for content by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Catalog to search
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: CatalogFilter,

    /// Result page to fetch
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Catalog selector for search and info
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFilter {
    /// Movies
    Movie,
    /// TV shows
    Tv,
    /// Anime (TV filtered to animation + Japanese original language)
    Anime,
}

/// Get trending movies and TV shows
#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Time window for trending
    #[arg(long, short = 'w', value_enum, default_value = "day")]
    pub window: TrendingWindow,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Time window for trending content
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    /// Today's trending
    #[default]
    Day,
    /// This week's trending
    Week,
}

impl TrendingWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

/// Browse the anime catalog
#[derive(Args, Debug)]
pub struct AnimeCmd {
    /// Result page to fetch
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Get detailed information about a movie or TV show
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB content id
    #[arg(required = true)]
    pub id: u64,

    /// Catalog the id belongs to
    #[arg(long, short = 't', value_enum)]
    pub media_type: CatalogFilter,
}

// =============================================================================
// Playback Commands
// =============================================================================

/// List registered playback mirrors
#[derive(Args, Debug)]
pub struct MirrorsCmd {}

/// Identifier arguments shared by `url` and `play`.
///
/// Kept as raw strings and funneled through the same route-parameter
/// validation the player screen uses, so both surfaces fail identically on
/// bad input.
#[derive(Args, Debug)]
pub struct PlaybackArgs {
    /// TMDB content id
    #[arg(required = true)]
    pub id: String,

    /// IMDb id, preferred by some mirrors (e.g. tt0137523)
    #[arg(long)]
    pub imdb_id: Option<String>,

    /// Display title
    #[arg(long)]
    pub title: Option<String>,

    /// Treat the content as a series
    #[arg(long)]
    pub tv: bool,

    /// Season number (series only)
    #[arg(long, short = 's')]
    pub season: Option<u32>,

    /// Episode number (series only)
    #[arg(long, short = 'e')]
    pub episode: Option<u32>,
}

impl PlaybackArgs {
    /// Convert to route parameters for the shared validation path
    pub fn route_params(&self) -> RouteParams {
        RouteParams {
            id: Some(self.id.clone()),
            imdb_id: self.imdb_id.clone(),
            title: self.title.clone(),
            media_type: self.tv.then(|| "tv".to_string()),
            season: self.season.map(|s| s.to_string()),
            episode: self.episode.map(|e| e.to_string()),
        }
    }
}

/// Print embed URLs without opening anything
#[derive(Args, Debug)]
pub struct UrlCmd {
    #[command(flatten)]
    pub target: PlaybackArgs,

    /// Only print the URL for this mirror id
    #[arg(long, short = 'm')]
    pub mirror: Option<String>,
}

/// Open content on a playback mirror
#[derive(Args, Debug)]
pub struct PlayCmd {
    #[command(flatten)]
    pub target: PlaybackArgs,

    /// Start on this mirror id instead of the highest-priority one
    #[arg(long, short = 'm')]
    pub mirror: Option<String>,

    /// Print the URL instead of opening the browser
    #[arg(long)]
    pub no_open: bool,
}

// =============================================================================
// Saved Items Commands
// =============================================================================

/// Manage the saved-items list
#[derive(Args, Debug)]
pub struct SavedCmd {
    #[command(subcommand)]
    pub action: SavedAction,
}

#[derive(Subcommand, Debug)]
pub enum SavedAction {
    /// List saved items
    #[command(visible_alias = "ls")]
    List,

    /// Save an item
    Add(SavedAddCmd),

    /// Remove a saved item by id
    #[command(visible_alias = "rm")]
    Remove(SavedRemoveCmd),
}

/// Save an item to the list
#[derive(Args, Debug)]
pub struct SavedAddCmd {
    /// TMDB content id
    #[arg(required = true)]
    pub id: u64,

    /// Display title
    #[arg(required = true)]
    pub title: String,

    /// Treat the item as a series
    #[arg(long)]
    pub tv: bool,

    /// Release year
    #[arg(long)]
    pub year: Option<u16>,

    /// Poster path fragment from the metadata provider
    #[arg(long)]
    pub poster_path: Option<String>,

    /// Rating (0.0 - 10.0)
    #[arg(long, default_value = "0.0")]
    pub rating: f32,
}

/// Remove a saved item
#[derive(Args, Debug)]
pub struct SavedRemoveCmd {
    /// TMDB content id
    #[arg(required = true)]
    pub id: u64,
}

// =============================================================================
// Progress Command
// =============================================================================

/// Show stored playback progress
#[derive(Args, Debug)]
pub struct ProgressCmd {
    #[command(flatten)]
    pub target: PlaybackArgs,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // For non-JSON, caller should handle formatting
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["serenya"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["serenya", "search", "fight club"]);
        assert!(cli.is_cli_mode());
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.query, "fight club");
            assert_eq!(cmd.media_type, CatalogFilter::Movie);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["serenya", "--json", "--quiet", "search", "test"]);
        assert!(cli.json);
        assert!(cli.quiet);
    }

    #[test]
    fn test_url_command_series_args() {
        let cli = Cli::parse_from([
            "serenya", "url", "1399", "--tv", "-s", "2", "-e", "5", "--imdb-id", "tt0944947",
        ]);
        if let Some(Command::Url(cmd)) = cli.command {
            let params = cmd.target.route_params();
            assert_eq!(params.id.as_deref(), Some("1399"));
            assert_eq!(params.media_type.as_deref(), Some("tv"));
            assert_eq!(params.season.as_deref(), Some("2"));
            assert_eq!(params.episode.as_deref(), Some("5"));
            assert_eq!(params.imdb_id.as_deref(), Some("tt0944947"));
        } else {
            panic!("Expected Url command");
        }
    }

    #[test]
    fn test_play_defaults_to_movie_route() {
        let cli = Cli::parse_from(["serenya", "play", "550"]);
        if let Some(Command::Play(cmd)) = cli.command {
            let params = cmd.target.route_params();
            assert!(params.media_type.is_none());
            assert!(!cmd.no_open);
        } else {
            panic!("Expected Play command");
        }
    }

    #[test]
    fn test_saved_subcommands() {
        let cli = Cli::parse_from(["serenya", "saved", "add", "550", "Fight Club", "--year", "1999"]);
        if let Some(Command::Saved(cmd)) = cli.command {
            match cmd.action {
                SavedAction::Add(add) => {
                    assert_eq!(add.id, 550);
                    assert_eq!(add.title, "Fight Club");
                    assert_eq!(add.year, Some(1999));
                    assert!(!add.tv);
                }
                _ => panic!("Expected Add action"),
            }
        } else {
            panic!("Expected Saved command");
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::CannotPlay), 4);
        assert_eq!(i32::from(ExitCode::OpenFailed), 5);
    }
}
