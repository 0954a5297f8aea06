//! Mirror registry tests
//!
//! Covers the provider ordering contract and each provider's embed URL
//! dialect for movies and series.

use serenya::models::PlaybackRequest;
use serenya::player::MirrorRegistry;

// =============================================================================
// Ordering Tests
// =============================================================================

#[test]
fn test_builtin_priorities_are_nondecreasing() {
    let registry = MirrorRegistry::builtin();
    let priorities: Vec<u8> = registry.by_priority().iter().map(|m| m.priority).collect();

    assert!(!priorities.is_empty());
    assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_builtin_starts_with_vidsrc() {
    let registry = MirrorRegistry::builtin();
    assert_eq!(registry.get(0).unwrap().id, "vidsrc");
    assert_eq!(registry.len(), 5);
}

#[test]
fn test_position_by_id() {
    let registry = MirrorRegistry::builtin();
    assert_eq!(registry.position("vidking"), Some(2));
    assert_eq!(registry.position("nope"), None);
}

// =============================================================================
// Movie URL Tests
// =============================================================================

#[test]
fn test_movie_urls_without_imdb_use_tmdb_id() {
    let registry = MirrorRegistry::builtin();
    let request = PlaybackRequest::movie(550);

    for mirror in registry.by_priority() {
        let url = mirror.build_url(&request);
        assert!(
            url.contains("550"),
            "{} URL should carry the TMDB id: {}",
            mirror.id,
            url
        );
        assert!(url.starts_with("https://"), "{}: {}", mirror.id, url);
    }
}

#[test]
fn test_imdb_preferring_mirrors_use_imdb_when_present() {
    let registry = MirrorRegistry::builtin();
    let request = PlaybackRequest::movie(550).with_imdb_id("tt0137523");

    // vidsrc switches its query parameter entirely
    let vidsrc = registry.get(registry.position("vidsrc").unwrap()).unwrap();
    let url = vidsrc.build_url(&request);
    assert!(url.contains("imdb=tt0137523"), "{}", url);
    assert!(!url.contains("tmdb="), "{}", url);

    // 2embed and vidfast put the IMDb id in the path
    for id in ["2embed", "vidfast"] {
        let mirror = registry.get(registry.position(id).unwrap()).unwrap();
        let url = mirror.build_url(&request);
        assert!(url.contains("tt0137523"), "{}: {}", id, url);
    }

    // vidking and vidlink only speak TMDB ids
    for id in ["vidking", "vidlink"] {
        let mirror = registry.get(registry.position(id).unwrap()).unwrap();
        let url = mirror.build_url(&request);
        assert!(!url.contains("tt0137523"), "{}: {}", id, url);
        assert!(url.contains("550"), "{}: {}", id, url);
    }
}

#[test]
fn test_empty_imdb_id_falls_back_to_tmdb() {
    let registry = MirrorRegistry::builtin();
    let request = PlaybackRequest::movie(550).with_imdb_id("");

    let vidsrc = registry.get(0).unwrap();
    let url = vidsrc.build_url(&request);
    assert!(url.contains("tmdb=550"), "{}", url);
}

// =============================================================================
// Series URL Tests
// =============================================================================

#[test]
fn test_series_urls_carry_season_and_episode() {
    let registry = MirrorRegistry::builtin();
    let request = PlaybackRequest::series(1399, 2, 5);

    for mirror in registry.by_priority() {
        let url = mirror.build_url(&request);
        let has_episode = url.contains("/2/5")
            || url.contains("season=2") && url.contains("episode=5")
            || url.contains("s=2") && url.contains("e=5");
        assert!(
            has_episode,
            "{} series URL should encode S2E5: {}",
            mirror.id, url
        );
    }
}

#[test]
fn test_movie_and_series_urls_differ() {
    let registry = MirrorRegistry::builtin();
    let movie = PlaybackRequest::movie(1399);
    let episode = PlaybackRequest::series(1399, 2, 5);

    for mirror in registry.by_priority() {
        assert_ne!(
            mirror.build_url(&movie),
            mirror.build_url(&episode),
            "{} should use a distinct series dialect",
            mirror.id
        );
    }
}

#[test]
fn test_vidsrc_series_shape() {
    let registry = MirrorRegistry::builtin();
    let request = PlaybackRequest::series(1399, 2, 5).with_imdb_id("tt0944947");
    let url = registry.get(0).unwrap().build_url(&request);

    assert_eq!(
        url,
        "https://vidsrc.xyz/embed/tv?imdb=tt0944947&season=2&episode=5&autoplay=1"
    );
}

#[test]
fn test_vidking_series_shape() {
    let registry = MirrorRegistry::builtin();
    let request = PlaybackRequest::series(1399, 2, 5);
    let mirror = registry.get(registry.position("vidking").unwrap()).unwrap();

    assert_eq!(
        mirror.build_url(&request),
        "https://www.vidking.net/embed/tv/1399/2/5?color=16A085&autoPlay=true"
    );
}

// =============================================================================
// Override Tests
// =============================================================================

#[test]
fn test_base_url_override_applies_to_urls() {
    let mut registry = MirrorRegistry::builtin();
    registry.override_base_url("vidlink", "https://mirror.example.org/");

    let mirror = registry.get(registry.position("vidlink").unwrap()).unwrap();
    let url = mirror.build_url(&PlaybackRequest::movie(550));
    assert!(url.starts_with("https://mirror.example.org/movie/550"), "{}", url);
}
