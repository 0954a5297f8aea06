//! CLI command tests
//!
//! Argument parsing, the route-parameter funnel shared with the player
//! screen, and exit code semantics.

mod cli_parsing {
    use clap::Parser;
    use serenya::cli::{CatalogFilter, Cli, Command, SavedAction, TrendingWindow};

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["serenya"]);
        assert!(!cli.is_cli_mode());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::parse_from(["serenya", "search", "dune"]);
        match cli.command {
            Some(Command::Search(cmd)) => {
                assert_eq!(cmd.query, "dune");
                assert_eq!(cmd.media_type, CatalogFilter::Movie);
                assert_eq!(cmd.page, 1);
                assert_eq!(cmd.limit, 20);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_search_with_filters() {
        let cli = Cli::parse_from([
            "serenya", "search", "frieren", "-t", "anime", "-p", "2", "-l", "5",
        ]);
        match cli.command {
            Some(Command::Search(cmd)) => {
                assert_eq!(cmd.media_type, CatalogFilter::Anime);
                assert_eq!(cmd.page, 2);
                assert_eq!(cmd.limit, 5);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_search_alias() {
        let cli = Cli::parse_from(["serenya", "s", "dune"]);
        assert!(matches!(cli.command, Some(Command::Search(_))));
    }

    #[test]
    fn test_trending_window() {
        let cli = Cli::parse_from(["serenya", "trending", "-w", "week"]);
        match cli.command {
            Some(Command::Trending(cmd)) => {
                assert_eq!(cmd.window, TrendingWindow::Week);
                assert_eq!(cmd.window.as_str(), "week");
            }
            _ => panic!("Expected Trending command"),
        }
    }

    #[test]
    fn test_info_requires_media_type() {
        assert!(Cli::try_parse_from(["serenya", "info", "550"]).is_err());

        let cli = Cli::parse_from(["serenya", "info", "550", "-t", "movie"]);
        match cli.command {
            Some(Command::Info(cmd)) => assert_eq!(cmd.id, 550),
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_play_with_mirror_and_no_open() {
        let cli = Cli::parse_from(["serenya", "play", "550", "-m", "vidking", "--no-open"]);
        match cli.command {
            Some(Command::Play(cmd)) => {
                assert_eq!(cmd.mirror.as_deref(), Some("vidking"));
                assert!(cmd.no_open);
            }
            _ => panic!("Expected Play command"),
        }
    }

    #[test]
    fn test_saved_actions() {
        let cli = Cli::parse_from(["serenya", "saved", "ls"]);
        match cli.command {
            Some(Command::Saved(cmd)) => assert!(matches!(cmd.action, SavedAction::List)),
            _ => panic!("Expected Saved command"),
        }

        let cli = Cli::parse_from(["serenya", "saved", "rm", "550"]);
        match cli.command {
            Some(Command::Saved(cmd)) => match cmd.action {
                SavedAction::Remove(rm) => assert_eq!(rm.id, 550),
                _ => panic!("Expected Remove action"),
            },
            _ => panic!("Expected Saved command"),
        }
    }
}

// =============================================================================
// Route Parameter Funnel
// =============================================================================

mod route_funnel {
    use clap::Parser;
    use serenya::cli::{Cli, Command};
    use serenya::models::MediaType;
    use serenya::player::PlayerError;

    #[test]
    fn test_url_args_flow_into_playback_request() {
        let cli = Cli::parse_from([
            "serenya", "url", "1399", "--tv", "-s", "2", "-e", "5",
            "--imdb-id", "tt0944947", "--title", "Game of Thrones",
        ]);
        let Some(Command::Url(cmd)) = cli.command else {
            panic!("Expected Url command");
        };

        let request = cmd.target.route_params().into_request().unwrap();
        assert_eq!(request.content_id, 1399);
        assert_eq!(request.media_type, MediaType::Tv);
        assert_eq!((request.season, request.episode), (2, 5));
        assert_eq!(request.imdb_id.as_deref(), Some("tt0944947"));
        assert_eq!(request.title.as_deref(), Some("Game of Thrones"));
    }

    #[test]
    fn test_non_numeric_id_is_cannot_play() {
        // The CLI accepts any string id; validation happens in the same
        // funnel the player screen uses
        let cli = Cli::parse_from(["serenya", "url", "tt0944947"]);
        let Some(Command::Url(cmd)) = cli.command else {
            panic!("Expected Url command");
        };

        let result = cmd.target.route_params().into_request();
        assert_eq!(result, Err(PlayerError::CannotPlay));
    }

    #[test]
    fn test_season_defaults_to_one_for_series() {
        let cli = Cli::parse_from(["serenya", "url", "1399", "--tv"]);
        let Some(Command::Url(cmd)) = cli.command else {
            panic!("Expected Url command");
        };

        let request = cmd.target.route_params().into_request().unwrap();
        assert!(request.is_series());
        assert_eq!((request.season, request.episode), (1, 1));
    }
}

// =============================================================================
// Exit Codes and JSON Output
// =============================================================================

mod output {
    use serenya::cli::{ExitCode, JsonOutput};

    #[test]
    fn test_exit_code_values() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::CannotPlay), 4);
        assert_eq!(i32::from(ExitCode::OpenFailed), 5);
    }

    #[test]
    fn test_json_success_shape() {
        let output = JsonOutput::success(vec!["vidsrc", "2embed"]);
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"data\""));
        assert!(!json.contains("\"error\""));
        assert!(!json.contains("\"exit_code\""));
    }

    #[test]
    fn test_json_error_shape() {
        let output = JsonOutput::<()>::error_msg("boom", ExitCode::CannotPlay);
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"error\":\"boom\""));
        assert!(json.contains("\"exit_code\":4"));
        assert!(!json.contains("\"data\""));
    }
}
