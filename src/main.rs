//! Serenya - terminal front end for a mirror-backed streaming catalog
//!
//! Browse movies, series, and anime, then hand playback to third-party embed
//! mirrors with ordered fallback. The terminal picks the mirror; the system
//! browser renders it.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! serenya
//!
//! # CLI mode (for automation)
//! serenya search "fight club"
//! serenya url 1399 --tv -s 2 -e 5
//! serenya play 550 --json
//! ```

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

use serenya::api::TmdbClient;
use serenya::app::{
    self, App, AppAction, AppState, Catalog, DetailFocus, DetailState, InputMode, PlayerScreen,
};
use serenya::cli::{Cli, Command, ExitCode, Output};
use serenya::commands;
use serenya::config::Config;
use serenya::models::MediaType;
use serenya::player::{BrowserFrame, EmbedFrame, FrameEvent, PlayerError, PlayerSession};
use serenya::storage::{Library, ProgressStore};
use serenya::ui::Theme;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        run_tui().await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &output).await,

        Some(Command::Trending(cmd)) => commands::trending_cmd(cmd, &output).await,

        Some(Command::Anime(cmd)) => commands::anime_cmd(cmd, &output).await,

        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &output).await,

        Some(Command::Mirrors(cmd)) => commands::mirrors_cmd(cmd, &output).await,

        Some(Command::Url(cmd)) => commands::url_cmd(cmd, &output).await,

        Some(Command::Play(cmd)) => commands::play_cmd(cmd, &output).await,

        Some(Command::Saved(cmd)) => commands::saved_cmd(cmd, &output).await,

        Some(Command::Progress(cmd)) => commands::progress_cmd(cmd, &output).await,

        None => {
            // Unreachable (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui() -> Result<()> {
    let mut terminal = init_terminal()?;
    let mut app = App::new();

    let result = run_event_loop(&mut terminal, &mut app).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Everything the event loop talks to besides the terminal
struct Services {
    client: TmdbClient,
    library: Option<Library>,
    progress: Option<ProgressStore>,
}

impl Services {
    fn new() -> Self {
        let mut config = Config::load();
        Self {
            client: TmdbClient::new(config.get_tmdb_api_key()),
            library: Library::open_default(),
            progress: ProgressStore::open_default(),
        }
    }
}

/// Main event loop - handles input, updates state, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    let services = Services::new();

    // Seed home screen with trending and the saved-ids cache
    if let Some(library) = &services.library {
        app.saved_ids = library.list().iter().map(|i| i.id).collect();
    }
    match services.client.trending("day").await {
        Ok(page) => app.home.set_results(page.results),
        Err(e) => app.home.loading = app::LoadingState::Error(e.to_string()),
    }

    while app.running {
        terminal.draw(|frame| render_ui(frame, app))?;

        // Poll for events with timeout so redraws keep happening
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        // Show the loading state before blocking on I/O
                        terminal.draw(|frame| render_ui(frame, app))?;
                        apply_action(app, action, &services).await;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Perform the I/O half of a key press
async fn apply_action(app: &mut App, action: AppAction, services: &Services) {
    match action {
        AppAction::SubmitSearch => {
            app.search.loading = app::LoadingState::Loading(Some("Searching...".into()));
            let query = app.search.query.clone();
            let result = match app.search.catalog {
                Catalog::Movies => services.client.search_movies(&query, 1).await,
                Catalog::Series => services.client.search_tv(&query, 1).await,
                Catalog::Anime => services.client.search_anime(&query, 1).await,
            };
            match result {
                Ok(page) => app.search.set_results(page.results),
                Err(e) => app.search.loading = app::LoadingState::Error(e.to_string()),
            }
        }

        AppAction::OpenDetail(result) => match result.media_type {
            MediaType::Movie => match services.client.movie_detail(result.id).await {
                Ok(detail) => {
                    app.detail = Some(DetailState::movie(detail));
                    app.navigate(AppState::Detail);
                }
                Err(e) => app.set_error(format!("Failed to load details: {}", e)),
            },
            MediaType::Tv => match services.client.tv_detail(result.id).await {
                Ok(detail) => {
                    app.detail = Some(DetailState::tv(detail));
                    app.navigate(AppState::Detail);
                }
                Err(e) => app.set_error(format!("Failed to load details: {}", e)),
            },
        },

        AppAction::LoadSeason(season) => {
            let Some(DetailState::Tv { detail, .. }) = &app.detail else {
                return;
            };
            let id = detail.id;
            match services.client.tv_season(id, season).await {
                Ok(episodes) => {
                    if let Some(detail) = &mut app.detail {
                        detail.set_episodes(episodes);
                    }
                }
                Err(e) => app.set_error(format!("Failed to load season: {}", e)),
            }
        }

        AppAction::StartPlayback(params) => {
            let config = Config::load();
            match PlayerSession::from_route(config.mirror_registry(), params) {
                Ok(mut session) => {
                    if let Some(store) = &services.progress {
                        session = session.with_progress_store(store.clone());
                    }
                    app.player = Some(PlayerScreen::active(session));
                    app.navigate(AppState::Player);
                    open_current_mirror(app);
                }
                Err(PlayerError::CannotPlay) => {
                    app.player = Some(PlayerScreen::CannotPlay);
                    app.navigate(AppState::Player);
                }
                Err(e) => app.set_error(e.to_string()),
            }
        }

        AppAction::OpenCurrentMirror => open_current_mirror(app),

        AppAction::ToggleSaved(item) => {
            let Some(library) = &services.library else {
                app.set_error("No data directory available");
                return;
            };
            let result = if app.is_saved(item.id) {
                library.remove(item.id).map(|_| ())
            } else {
                library.add(item).map(|_| ())
            };
            match result {
                Ok(()) => app.saved_ids = library.list().iter().map(|i| i.id).collect(),
                Err(e) => app.set_error(format!("Saved list update failed: {}", e)),
            }
        }
    }
}

/// Hand the session's current URL to the browser frame, feeding any open
/// failure back into the session as a load error
fn open_current_mirror(app: &mut App) {
    let Some(PlayerScreen::Active {
        session, notice, ..
    }) = &mut app.player
    else {
        return;
    };

    let url = session.current_url();
    let mut frame = BrowserFrame::new();
    if let Err(e) = frame.set_url(&url) {
        session.apply_event(FrameEvent::LoadError);
        *notice = Some(e.to_string());
    }
}

// =============================================================================
// UI Rendering
// =============================================================================

/// Main render function - dispatches to view-specific renderers
fn render_ui(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Clear with background color
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    // Main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    // Error overlay on top of everything
    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

/// Render the header with title and search box
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14), // Logo
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(Span::styled(
        "SERENYA",
        ratatui::style::Style::default()
            .fg(Theme::PRIMARY)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, header_chunks[0]);

    let search_style = if app.input_mode == InputMode::Editing {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let search_text = if app.input_mode == InputMode::Editing {
        let query = &app.search.query;
        let cursor = app.search.cursor.min(query.len());
        let (before, after) = query.split_at(cursor);
        format!("⌕ {}│{}", before, after)
    } else if app.search.query.is_empty() {
        "⌕ Type / to search...".to_string()
    } else {
        format!("⌕ {}", app.search.query)
    };

    let search_box = Paragraph::new(search_text)
        .style(if app.input_mode == InputMode::Editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(search_style)
                .title(Span::styled(
                    format!(" SEARCH · {} ", app.search.catalog.label()),
                    Theme::title(),
                )),
        );
    frame.render_widget(search_box, header_chunks[1]);
}

/// Render the main content area based on current state
fn render_content(frame: &mut Frame, area: Rect, app: &mut App) {
    match app.state {
        AppState::Home => render_home(frame, area, app),
        AppState::Search => render_search_results(frame, area, app),
        AppState::Detail => render_detail(frame, area, app),
        AppState::Player => render_player(frame, area, app),
    }
}

/// One catalog entry as a list row, shared by home and search
fn result_row(result: &serenya::models::SearchResult, is_selected: bool, saved: bool) -> ListItem {
    let marker = if is_selected { "▸ " } else { "  " };
    let year_str = result.year.map(|y| format!(" ({})", y)).unwrap_or_default();
    let type_str = match result.media_type {
        MediaType::Movie => "MOVIE",
        MediaType::Tv => "TV",
    };

    let mut spans = vec![
        Span::styled(
            marker,
            if is_selected {
                Theme::accent()
            } else {
                Theme::dimmed()
            },
        ),
        Span::styled(
            result.title.clone(),
            if is_selected {
                Theme::highlighted()
            } else {
                Theme::text()
            },
        ),
        Span::styled(year_str, Theme::year()),
        Span::raw(" "),
        Span::styled(format!("[{}]", type_str), Theme::secondary()),
        Span::raw(" "),
        Span::styled(format!("★ {:.1}", result.vote_average), Theme::rating()),
    ];
    if saved {
        spans.push(Span::raw(" "));
        spans.push(Span::styled("♥", Theme::success()));
    }

    ListItem::new(Line::from(spans))
}

/// Render home screen with trending content
fn render_home(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" TRENDING TODAY ", Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.home.loading.is_loading() {
        let loading = Paragraph::new("⟳ Loading trending...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if app.home.results.is_empty() {
        let help = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Welcome to Serenya", Theme::title())),
            Line::from(""),
            Line::from(vec![
                Span::styled("  /  ", Theme::keybind()),
                Span::styled("Search movies, series & anime", Theme::keybind_desc()),
            ]),
            Line::from(vec![
                Span::styled("  ↵  ", Theme::keybind()),
                Span::styled("Open details", Theme::keybind_desc()),
            ]),
            Line::from(vec![
                Span::styled("  b  ", Theme::keybind()),
                Span::styled("Save for later", Theme::keybind_desc()),
            ]),
            Line::from(vec![
                Span::styled("  q  ", Theme::keybind()),
                Span::styled("Quit", Theme::keybind_desc()),
            ]),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(help, inner);
        return;
    }

    let visible = inner.height as usize;
    app.home.list.scroll_into_view(visible);
    let offset = app.home.list.offset;
    let selected = app.home.list.selected;
    let items: Vec<ListItem> = app
        .home
        .results
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, result)| result_row(result, i == selected, app.is_saved(result.id)))
        .collect();

    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

/// Render search results
fn render_search_results(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(
                " {} RESULTS ({}) ",
                app.search.catalog.label().to_uppercase(),
                app.search.results.len()
            ),
            Theme::title(),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.search.loading.is_loading() {
        let loading = Paragraph::new("⟳ Searching...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if let app::LoadingState::Error(msg) = &app.search.loading {
        let error = Paragraph::new(msg.as_str())
            .style(Theme::error())
            .alignment(Alignment::Center);
        frame.render_widget(error, inner);
        return;
    }

    if app.search.results.is_empty() {
        let empty = Paragraph::new(if app.search.query.is_empty() {
            "Type to search; Tab cycles Movies / Series / Anime"
        } else {
            "No results found"
        })
        .style(Theme::dimmed())
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let visible = inner.height as usize;
    app.search.list.scroll_into_view(visible);
    let offset = app.search.list.offset;
    let selected = app.search.list.selected;
    let items: Vec<ListItem> = app
        .search
        .results
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, result)| result_row(result, i == selected, app.is_saved(result.id)))
        .collect();

    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

/// Render detail view (movie or TV show)
fn render_detail(frame: &mut Frame, area: Rect, app: &mut App) {
    let Some(detail) = &mut app.detail else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(format!(" {} ", detail.title()), Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match detail {
        DetailState::Movie { detail, .. } => {
            let hours = detail.runtime / 60;
            let mins = detail.runtime % 60;
            let content = Paragraph::new(vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("{} ", detail.year), Theme::year()),
                    Span::styled(format!("· {}h {}m ", hours, mins), Theme::dimmed()),
                    Span::styled(format!("· ★ {:.1}", detail.vote_average), Theme::rating()),
                ]),
                Line::from(Span::styled(detail.genres.join(" / "), Theme::genre())),
                Line::from(""),
                Line::from(Span::styled(detail.overview.clone(), Theme::text())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("  ↵/p ", Theme::keybind()),
                    Span::styled("Play  ", Theme::keybind_desc()),
                    Span::styled(" ESC ", Theme::keybind()),
                    Span::styled("Back", Theme::keybind_desc()),
                ]),
            ])
            .wrap(Wrap { trim: true });
            frame.render_widget(content, inner);
        }
        DetailState::Tv {
            detail,
            season_list,
            episode_list,
            episodes,
            focus,
            loading,
        } => {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(inner);

            // Seasons pane
            let seasons_focused = *focus == DetailFocus::Seasons;
            let season_block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if seasons_focused {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(Span::styled(" SEASONS ", Theme::title()));
            let season_inner = season_block.inner(panes[0]);
            frame.render_widget(season_block, panes[0]);

            let items: Vec<ListItem> = detail
                .seasons
                .iter()
                .enumerate()
                .map(|(i, season)| {
                    let is_selected = i == season_list.selected;
                    ListItem::new(Line::from(Span::styled(
                        format!(
                            "{} {} ({} ep)",
                            if is_selected { "▸" } else { " " },
                            season
                                .name
                                .clone()
                                .unwrap_or_else(|| format!("Season {}", season.season_number)),
                            season.episode_count
                        ),
                        if is_selected && seasons_focused {
                            Theme::highlighted()
                        } else if is_selected {
                            Theme::selected()
                        } else {
                            Theme::text()
                        },
                    )))
                })
                .collect();
            frame.render_widget(List::new(items).style(Theme::text()), season_inner);

            // Episodes pane
            let episode_block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if seasons_focused {
                    Theme::border()
                } else {
                    Theme::border_focused()
                })
                .title(Span::styled(" EPISODES ", Theme::title()));
            let episode_inner = episode_block.inner(panes[1]);
            frame.render_widget(episode_block, panes[1]);

            if loading.is_loading() {
                let loading = Paragraph::new("⟳ Loading episodes...")
                    .style(Theme::loading())
                    .alignment(Alignment::Center);
                frame.render_widget(loading, episode_inner);
            } else if episodes.is_empty() {
                let hint = Paragraph::new("Select a season and press ↵")
                    .style(Theme::dimmed())
                    .alignment(Alignment::Center);
                frame.render_widget(hint, episode_inner);
            } else {
                let visible = episode_inner.height as usize;
                episode_list.scroll_into_view(visible);
                let offset = episode_list.offset;
                let selected = episode_list.selected;
                let items: Vec<ListItem> = episodes
                    .iter()
                    .enumerate()
                    .skip(offset)
                    .take(visible)
                    .map(|(i, episode)| {
                        let is_selected = i == selected;
                        ListItem::new(Line::from(vec![
                            Span::styled(
                                format!(
                                    "{} S{:02}E{:02} ",
                                    if is_selected { "▸" } else { " " },
                                    episode.season,
                                    episode.episode
                                ),
                                Theme::secondary(),
                            ),
                            Span::styled(
                                episode.name.clone(),
                                if is_selected && !seasons_focused {
                                    Theme::highlighted()
                                } else {
                                    Theme::text()
                                },
                            ),
                        ]))
                    })
                    .collect();
                frame.render_widget(List::new(items).style(Theme::text()), episode_inner);
            }
        }
    }
}

/// Render the player screen: active session or the cannot-play dead end
fn render_player(frame: &mut Frame, area: Rect, app: &App) {
    match &app.player {
        Some(PlayerScreen::Active {
            session,
            selector,
            notice,
        }) => render_active_player(frame, area, session, selector, notice.as_deref()),
        Some(PlayerScreen::CannotPlay) | None => render_cannot_play(frame, area),
    }
}

/// Dead-end view for an unplayable route; no mirror UI is offered
fn render_cannot_play(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::error())
        .title(Span::styled(" PLAYER ", Theme::error()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Cannot play this title", Theme::error())),
        Line::from(""),
        Line::from(Span::styled(
            "The content id is missing or invalid.",
            Theme::dimmed(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ESC ", Theme::keybind()),
            Span::styled("Go back", Theme::keybind_desc()),
        ]),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(content, inner);
}

fn render_active_player(
    frame: &mut Frame,
    area: Rect,
    session: &PlayerSession,
    selector: &app::ListState,
    notice: Option<&str>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(" ▶ NOW PLAYING ", Theme::success()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mirror = session.current_mirror();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            session.request().to_string(),
            ratatui::style::Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Mirror: ", Theme::dimmed()),
            Span::styled(mirror.display_name, Theme::mirror_active()),
            Span::styled(
                format!(
                    "  ({}/{})",
                    session.mirror_index() + 1,
                    session.registry().len()
                ),
                Theme::dimmed(),
            ),
        ]),
        Line::from(Span::styled(session.current_url(), Theme::secondary())),
        Line::from(""),
    ];

    if session.has_error() {
        lines.push(Line::from(Span::styled(
            "✗ This mirror failed to load",
            Theme::error(),
        )));
        lines.push(Line::from(vec![
            Span::styled("  n  ", Theme::keybind()),
            Span::styled("Try next mirror  ", Theme::keybind_desc()),
            Span::styled("  m  ", Theme::keybind()),
            Span::styled("Pick a mirror", Theme::keybind_desc()),
        ]));
        lines.push(Line::from(""));
    }

    if let Some(notice) = notice {
        lines.push(Line::from(Span::styled(notice.to_string(), Theme::warning())));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("  m ", Theme::keybind()),
        Span::styled("mirrors  ", Theme::keybind_desc()),
        Span::styled(" n ", Theme::keybind()),
        Span::styled("next  ", Theme::keybind_desc()),
        Span::styled(" r ", Theme::keybind()),
        Span::styled("reload  ", Theme::keybind_desc()),
        Span::styled(" [ ] ", Theme::keybind()),
        Span::styled("episode  ", Theme::keybind_desc()),
        Span::styled(" ESC ", Theme::keybind()),
        Span::styled("back", Theme::keybind_desc()),
    ]));

    let para = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(para, inner);

    // Resume gauge from the stored progress record, if any
    if let Some(progress) = session.stored_progress() {
        if inner.height > 3 {
            let gauge_area = Rect {
                x: inner.x + 2,
                y: inner.y + inner.height - 2,
                width: inner.width.saturating_sub(4),
                height: 1,
            };
            let gauge = Gauge::default()
                .gauge_style(Theme::progress_bar())
                .ratio(progress.fraction())
                .label(format!(
                    "resume {:02}:{:02} / {:02}:{:02}",
                    (progress.current_time as u64) / 60,
                    (progress.current_time as u64) % 60,
                    (progress.duration as u64) / 60,
                    (progress.duration as u64) % 60
                ));
            frame.render_widget(gauge, gauge_area);
        }
    }

    if session.selector_open() {
        render_mirror_selector(frame, area, session, selector);
    }
}

/// Centered popup listing the mirror table by priority
fn render_mirror_selector(
    frame: &mut Frame,
    area: Rect,
    session: &PlayerSession,
    selector: &app::ListState,
) {
    let mirrors = session.registry().by_priority();
    let popup_width = 40.min(area.width.saturating_sub(4));
    let popup_height = (mirrors.len() as u16 + 2).min(area.height.saturating_sub(4));

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = mirrors
        .iter()
        .enumerate()
        .map(|(i, mirror)| {
            let is_current = i == session.mirror_index();
            let is_selected = i == selector.selected;
            let marker = if is_selected { "▸ " } else { "  " };
            let current = if is_current { " ●" } else { "" };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}{}. {}", marker, mirror.priority, mirror.display_name),
                    if is_selected {
                        Theme::list_item_selected()
                    } else {
                        Theme::list_item()
                    },
                ),
                Span::styled(current, Theme::mirror_active()),
            ]))
        })
        .collect();

    let list = List::new(items).style(Theme::text()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::border_focused())
            .title(Span::styled(" SELECT MIRROR ", Theme::title()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );
    frame.render_widget(list, popup_area);
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::ACCENT),
        ),
    };

    let state_indicator = Span::styled(
        format!(" {} ", format!("{:?}", app.state).to_uppercase()),
        ratatui::style::Style::default().fg(Theme::DIM),
    );

    let saved_indicator = Span::styled(
        format!(" ♥ {} saved ", app.saved_ids.len()),
        Theme::dimmed(),
    );

    let help = Span::styled(" q:quit  /:search  ESC:back ", Theme::dimmed());

    let status_line = Line::from(vec![
        mode_indicator,
        state_indicator,
        Span::raw(" "),
        saved_indicator,
        Span::raw(" │ "),
        help,
    ]);

    let status = Paragraph::new(status_line).style(Theme::status_bar());
    frame.render_widget(status, area);
}

/// Render error popup overlay
fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}
