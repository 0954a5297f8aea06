//! App state and core application logic
//!
//! Manages the application state machine, navigation stack,
//! and coordinates between UI and backend services. Key handling is pure
//! state manipulation; anything that needs I/O is returned to the event
//! loop as an [`AppAction`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::*;
use crate::player::{PlayerSession, RouteParams};

// =============================================================================
// App State Enum
// =============================================================================

/// Application state enum representing current screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AppState {
    /// Home screen with trending content
    #[default]
    Home,
    /// Search results view
    Search,
    /// Detail view for a movie or TV show
    Detail,
    /// Player screen (mirror handoff)
    Player,
}

// =============================================================================
// Actions
// =============================================================================

/// Work the event loop must perform on behalf of a key press
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Run the current search query
    SubmitSearch,
    /// Fetch details for a catalog entry and open the detail screen
    OpenDetail(SearchResult),
    /// Fetch the episode list for a season of the open TV detail
    LoadSeason(u32),
    /// Validate route parameters and open the player screen
    StartPlayback(RouteParams),
    /// Hand the session's current URL to the embed frame
    OpenCurrentMirror,
    /// Add or remove the entry from the saved-items list
    ToggleSaved(SavedItem),
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Move selection up by a page
    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    /// Move selection down by a page
    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible_height > 0 && self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Reset selection
    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Which catalog a search queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Catalog {
    #[default]
    Movies,
    Series,
    Anime,
}

impl Catalog {
    /// Cycle Movies -> Series -> Anime -> Movies
    pub fn next(self) -> Self {
        match self {
            Catalog::Movies => Catalog::Series,
            Catalog::Series => Catalog::Anime,
            Catalog::Anime => Catalog::Movies,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Catalog::Movies => "Movies",
            Catalog::Series => "Series",
            Catalog::Anime => "Anime",
        }
    }
}

/// Home view state (trending content)
#[derive(Debug, Clone, Default)]
pub struct HomeState {
    /// Trending results
    pub results: Vec<SearchResult>,
    /// Trending list state
    pub list: ListState,
    /// Loading state
    pub loading: LoadingState,
}

impl HomeState {
    pub fn set_results(&mut self, results: Vec<SearchResult>) {
        self.list.set_len(results.len());
        self.results = results;
        self.loading = LoadingState::Idle;
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.list.selected)
    }
}

/// Search view state
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Search query
    pub query: String,
    /// Cursor byte offset into query, always on a char boundary
    pub cursor: usize,
    /// Catalog the query runs against
    pub catalog: Catalog,
    /// Search results
    pub results: Vec<SearchResult>,
    /// Results list state
    pub list: ListState,
    /// Loading state
    pub loading: LoadingState,
}

impl SearchState {
    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        self.query.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if let Some(c) = self.query[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.query.remove(self.cursor);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.query.len() {
            self.query.remove(self.cursor);
        }
    }

    /// Move cursor left, stepping over the whole previous char
    pub fn cursor_left(&mut self) {
        if let Some(c) = self.query[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    /// Move cursor right, stepping over the whole next char
    pub fn cursor_right(&mut self) {
        if let Some(c) = self.query[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Move cursor to start
    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end
    pub fn cursor_end(&mut self) {
        self.cursor = self.query.len();
    }

    /// Clear query
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    /// Set results and update list state
    pub fn set_results(&mut self, results: Vec<SearchResult>) {
        self.list.set_len(results.len());
        self.results = results;
        self.loading = LoadingState::Idle;
    }

    /// Get currently selected result
    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.list.selected)
    }
}

/// Which pane of the TV detail has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailFocus {
    #[default]
    Seasons,
    Episodes,
}

/// Detail view state (movie or TV show)
#[derive(Debug, Clone)]
pub enum DetailState {
    /// Movie detail
    Movie {
        detail: MovieDetail,
        loading: LoadingState,
    },
    /// TV show detail
    Tv {
        detail: TvDetail,
        season_list: ListState,
        episode_list: ListState,
        episodes: Vec<Episode>,
        focus: DetailFocus,
        loading: LoadingState,
    },
}

impl DetailState {
    pub fn movie(detail: MovieDetail) -> Self {
        DetailState::Movie {
            detail,
            loading: LoadingState::Idle,
        }
    }

    pub fn tv(detail: TvDetail) -> Self {
        let season_count = detail.seasons.len();
        DetailState::Tv {
            detail,
            season_list: ListState::new(season_count),
            episode_list: ListState::new(0),
            episodes: Vec::new(),
            focus: DetailFocus::Seasons,
            loading: LoadingState::Idle,
        }
    }

    /// Get title for the current content
    pub fn title(&self) -> &str {
        match self {
            DetailState::Movie { detail, .. } => &detail.title,
            DetailState::Tv { detail, .. } => &detail.name,
        }
    }

    /// Get IMDb id for the current content, if known
    pub fn imdb_id(&self) -> Option<&str> {
        match self {
            DetailState::Movie { detail, .. } => detail.imdb_id.as_deref(),
            DetailState::Tv { detail, .. } => detail.imdb_id.as_deref(),
        }
    }

    /// Season number of the highlighted season entry (TV only)
    pub fn selected_season(&self) -> Option<u32> {
        match self {
            DetailState::Movie { .. } => None,
            DetailState::Tv {
                detail,
                season_list,
                ..
            } => detail
                .seasons
                .get(season_list.selected)
                .map(|s| s.season_number),
        }
    }

    /// Set the loaded episode list (TV only)
    pub fn set_episodes(&mut self, list: Vec<Episode>) {
        if let DetailState::Tv {
            episodes,
            episode_list,
            focus,
            loading,
            ..
        } = self
        {
            episode_list.set_len(list.len());
            episode_list.reset();
            *episodes = list;
            *focus = DetailFocus::Episodes;
            *loading = LoadingState::Idle;
        }
    }

    /// Route parameters for playing the current selection: the movie itself,
    /// or the highlighted episode of the loaded season
    pub fn playback_route(&self) -> Option<RouteParams> {
        match self {
            DetailState::Movie { detail, .. } => Some(RouteParams {
                id: Some(detail.id.to_string()),
                imdb_id: detail.imdb_id.clone(),
                title: Some(detail.title.clone()),
                ..Default::default()
            }),
            DetailState::Tv {
                detail,
                episodes,
                episode_list,
                ..
            } => {
                let episode = episodes.get(episode_list.selected)?;
                Some(RouteParams {
                    id: Some(detail.id.to_string()),
                    imdb_id: detail.imdb_id.clone(),
                    title: Some(detail.name.clone()),
                    media_type: Some("tv".to_string()),
                    season: Some(episode.season.to_string()),
                    episode: Some(episode.episode.to_string()),
                })
            }
        }
    }
}

/// Player view state
#[derive(Debug, Clone)]
pub enum PlayerScreen {
    /// The route could not be validated; dead-end view, no session exists
    CannotPlay,
    /// A live session driving the mirror table
    Active {
        session: PlayerSession,
        /// Selection state for the mirror selector popup
        selector: ListState,
        /// One-line status shown under the player info
        notice: Option<String>,
    },
}

impl PlayerScreen {
    pub fn active(session: PlayerSession) -> Self {
        let len = session.registry().len();
        let mut selector = ListState::new(len);
        selector.selected = session.mirror_index();
        PlayerScreen::Active {
            session,
            selector,
            notice: None,
        }
    }

    pub fn session(&self) -> Option<&PlayerSession> {
        match self {
            PlayerScreen::CannotPlay => None,
            PlayerScreen::Active { session, .. } => Some(session),
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug, Default)]
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Global error message
    pub error: Option<String>,

    // View-specific states
    pub home: HomeState,
    pub search: SearchState,
    pub detail: Option<DetailState>,
    pub player: Option<PlayerScreen>,

    /// Ids currently in the saved-items list (kept in sync by the event
    /// loop)
    pub saved_ids: Vec<u64>,
}

impl App {
    /// Create a new App instance
    pub fn new() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state.clone());
            self.state = state;
        }
        self.input_mode = InputMode::Normal;
    }

    /// Go back to previous state
    pub fn back(&mut self) -> bool {
        // If in editing mode, exit editing first
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
            return true;
        }

        if let Some(prev) = self.nav_stack.pop() {
            // A player session lives exactly as long as the player screen
            if self.state == AppState::Player {
                self.player = None;
            }
            self.state = prev;
            true
        } else {
            false
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        if self.state == AppState::Home || self.state == AppState::Search {
            self.input_mode = InputMode::Editing;
            if self.state == AppState::Home {
                self.navigate(AppState::Search);
                self.input_mode = InputMode::Editing;
            }
        }
    }

    pub fn is_saved(&self, id: u64) -> bool {
        self.saved_ids.contains(&id)
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event; returns work for the event loop, if any
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        // Clear error on any keypress
        self.error = None;

        // Global quit shortcut (Ctrl+C, or q in normal mode)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                if !self.search.query.trim().is_empty() {
                    return Some(AppAction::SubmitSearch);
                }
            }
            KeyCode::Tab => {
                self.search.catalog = self.search.catalog.next();
            }
            KeyCode::Char(c) => self.search.insert(c),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => self.search.cursor_left(),
            KeyCode::Right => self.search.cursor_right(),
            KeyCode::Home => self.search.cursor_home(),
            KeyCode::End => self.search.cursor_end(),
            _ => {}
        }
        None
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return None;
            }
            KeyCode::Char('/') => {
                if self.state == AppState::Home || self.state == AppState::Search {
                    self.focus_search();
                    return None;
                }
            }
            KeyCode::Esc => {
                // The player owns Esc while its selector popup is open
                if let Some(PlayerScreen::Active { session, .. }) = &mut self.player {
                    if self.state == AppState::Player && session.selector_open() {
                        session.close_selector();
                        return None;
                    }
                }
                self.back();
                return None;
            }
            _ => {}
        }

        match &self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::Search => self.handle_search_key(key),
            AppState::Detail => self.handle_detail_key(key),
            AppState::Player => self.handle_player_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.home.list.up(),
            KeyCode::Down | KeyCode::Char('j') => self.home.list.down(),
            KeyCode::Enter => {
                if let Some(result) = self.home.selected_result() {
                    return Some(AppAction::OpenDetail(result.clone()));
                }
            }
            KeyCode::Char('b') => {
                if let Some(result) = self.home.selected_result() {
                    return Some(AppAction::ToggleSaved(SavedItem::from(result)));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.search.list.up(),
            KeyCode::Down | KeyCode::Char('j') => self.search.list.down(),
            KeyCode::PageUp => self.search.list.page_up(10),
            KeyCode::PageDown => self.search.list.page_down(10),
            KeyCode::Home => self.search.list.first(),
            KeyCode::End => self.search.list.last(),
            KeyCode::Tab => {
                self.search.catalog = self.search.catalog.next();
                if !self.search.query.trim().is_empty() {
                    return Some(AppAction::SubmitSearch);
                }
            }
            KeyCode::Enter => {
                if let Some(result) = self.search.selected_result() {
                    return Some(AppAction::OpenDetail(result.clone()));
                }
            }
            KeyCode::Char('b') => {
                if let Some(result) = self.search.selected_result() {
                    return Some(AppAction::ToggleSaved(SavedItem::from(result)));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        let Some(detail) = &mut self.detail else {
            return None;
        };

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if let DetailState::Tv {
                    season_list,
                    episode_list,
                    focus,
                    ..
                } = detail
                {
                    match focus {
                        DetailFocus::Seasons => season_list.up(),
                        DetailFocus::Episodes => episode_list.up(),
                    }
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let DetailState::Tv {
                    season_list,
                    episode_list,
                    focus,
                    ..
                } = detail
                {
                    match focus {
                        DetailFocus::Seasons => season_list.down(),
                        DetailFocus::Episodes => episode_list.down(),
                    }
                }
            }
            KeyCode::Tab => {
                if let DetailState::Tv {
                    focus, episodes, ..
                } = detail
                {
                    *focus = match focus {
                        DetailFocus::Seasons if !episodes.is_empty() => DetailFocus::Episodes,
                        _ => DetailFocus::Seasons,
                    };
                }
            }
            KeyCode::Enter => match detail {
                DetailState::Movie { .. } => {
                    if let Some(params) = detail.playback_route() {
                        return Some(AppAction::StartPlayback(params));
                    }
                }
                DetailState::Tv { focus, .. } => match focus {
                    DetailFocus::Seasons => {
                        if let Some(season) = detail.selected_season() {
                            return Some(AppAction::LoadSeason(season));
                        }
                    }
                    DetailFocus::Episodes => {
                        if let Some(params) = detail.playback_route() {
                            return Some(AppAction::StartPlayback(params));
                        }
                    }
                },
            },
            KeyCode::Char('p') => {
                if let Some(params) = detail.playback_route() {
                    return Some(AppAction::StartPlayback(params));
                }
            }
            _ => {}
        }
        None
    }

    fn handle_player_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        let Some(PlayerScreen::Active {
            session,
            selector,
            notice,
        }) = &mut self.player
        else {
            // Cannot-play dead end; only Esc (handled globally) leaves it
            return None;
        };

        if session.selector_open() {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => selector.up(),
                KeyCode::Down | KeyCode::Char('j') => selector.down(),
                KeyCode::Enter => {
                    session.select_mirror(selector.selected);
                    *notice = Some(format!("Switched to {}", session.current_mirror().display_name));
                    return Some(AppAction::OpenCurrentMirror);
                }
                KeyCode::Char('m') => session.close_selector(),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('m') => {
                selector.selected = session.mirror_index();
                session.toggle_selector();
            }
            KeyCode::Char('n') => {
                session.try_next();
                *notice = Some(format!("Trying {}", session.current_mirror().display_name));
                return Some(AppAction::OpenCurrentMirror);
            }
            KeyCode::Char('r') | KeyCode::Enter => {
                *notice = Some("Reloading".to_string());
                return Some(AppAction::OpenCurrentMirror);
            }
            KeyCode::Char(']') => {
                if session.request().is_series() {
                    let request = session.request();
                    let (season, episode) = (request.season, request.episode + 1);
                    session.set_episode(season, episode);
                    *notice = Some(format!("S{:02}E{:02}", season, episode));
                    return Some(AppAction::OpenCurrentMirror);
                }
            }
            KeyCode::Char('[') => {
                if session.request().is_series() && session.request().episode > 1 {
                    let request = session.request();
                    let (season, episode) = (request.season, request.episode - 1);
                    session.set_episode(season, episode);
                    *notice = Some(format!("S{:02}E{:02}", season, episode));
                    return Some(AppAction::OpenCurrentMirror);
                }
            }
            _ => {}
        }
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
