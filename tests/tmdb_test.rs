//! TMDB API client tests
//!
//! Tests search, discover, metadata retrieval, and error handling.

use mockito::{Matcher, Server};
use serenya::api::TmdbClient;
use serenya::models::MediaType;

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_movies_parses_results() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "page": 1,
        "results": [
            {
                "id": 550,
                "title": "Fight Club",
                "release_date": "1999-10-15",
                "overview": "An insomniac office worker",
                "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
                "vote_average": 8.4
            },
            {
                "id": 157336,
                "title": "Interstellar",
                "release_date": "2014-11-05",
                "overview": "Space epic",
                "poster_path": "/gEU2QniE6E77NI6lCU6MxlNBvIx.jpg",
                "vote_average": 8.4
            }
        ],
        "total_results": 2,
        "total_pages": 1
    }"#;

    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "fight club".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("api_key".into(), "test_key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.search_movies("fight club", 1).await.unwrap();

    mock.assert_async().await;

    assert_eq!(page.results.len(), 2);
    assert_eq!(page.total_results, 2);

    // Movie-scoped search supplies the media type
    assert_eq!(page.results[0].id, 550);
    assert_eq!(page.results[0].media_type, MediaType::Movie);
    assert_eq!(page.results[0].title, "Fight Club");
    assert_eq!(page.results[0].year, Some(1999));
}

#[tokio::test]
async fn test_search_tv_uses_name_and_first_air_date() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "page": 1,
        "results": [
            {
                "id": 1399,
                "name": "Game of Thrones",
                "first_air_date": "2011-04-17",
                "overview": "Seven noble families",
                "poster_path": "/1XS1oqL89opfnbLl8WnZY1O1uJx.jpg",
                "vote_average": 8.4
            },
            {
                "id": 4,
                "name": "No Date Show",
                "first_air_date": "",
                "overview": "",
                "poster_path": null,
                "vote_average": 3.0
            }
        ],
        "total_results": 2,
        "total_pages": 1
    }"#;

    let mock = server
        .mock("GET", "/search/tv")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.search_tv("game of thrones", 1).await.unwrap();

    mock.assert_async().await;

    assert_eq!(page.results[0].media_type, MediaType::Tv);
    assert_eq!(page.results[0].title, "Game of Thrones");
    assert_eq!(page.results[0].year, Some(2011));
    assert_eq!(page.results[1].year, None);
}

#[tokio::test]
async fn test_search_anime_filters_genre_and_language() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "page": 1,
        "results": [
            {
                "id": 1429,
                "name": "Attack on Titan",
                "first_air_date": "2013-04-07",
                "overview": "Titans",
                "genre_ids": [16, 10759],
                "original_language": "ja",
                "poster_path": null,
                "vote_average": 8.7
            },
            {
                "id": 456,
                "name": "Western Cartoon",
                "first_air_date": "1989-12-17",
                "overview": "Not anime",
                "genre_ids": [16, 35],
                "original_language": "en",
                "poster_path": null,
                "vote_average": 8.0
            },
            {
                "id": 789,
                "name": "Japanese Drama",
                "first_air_date": "2020-01-01",
                "overview": "Not animated",
                "genre_ids": [18],
                "original_language": "ja",
                "poster_path": null,
                "vote_average": 7.0
            }
        ],
        "total_results": 3,
        "total_pages": 1
    }"#;

    let mock = server
        .mock("GET", "/search/tv")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.search_anime("titan", 1).await.unwrap();

    mock.assert_async().await;

    // Only the animation + Japanese original language entry survives
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].id, 1429);
}

// =============================================================================
// Trending / Discover Tests
// =============================================================================

#[tokio::test]
async fn test_trending_filters_person_results() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "page": 1,
        "results": [
            {
                "id": 100,
                "media_type": "movie",
                "title": "Trending Movie",
                "release_date": "2024-01-15",
                "overview": "Hot new movie",
                "poster_path": "/path.jpg",
                "vote_average": 8.0
            },
            {
                "id": 999,
                "media_type": "person",
                "name": "Some Actor",
                "known_for_department": "Acting"
            },
            {
                "id": 200,
                "media_type": "tv",
                "name": "Trending Show",
                "first_air_date": "2024-02-20",
                "overview": "Popular series",
                "poster_path": "/path2.jpg",
                "vote_average": 8.5
            }
        ],
        "total_results": 3,
        "total_pages": 1
    }"#;

    let mock = server
        .mock("GET", "/trending/all/day")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.trending("day").await.unwrap();

    mock.assert_async().await;

    // Person entries are dropped; movie and tv keep their own types
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].media_type, MediaType::Movie);
    assert_eq!(page.results[1].media_type, MediaType::Tv);
}

#[tokio::test]
async fn test_discover_anime_sends_filters() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/discover/tv")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("with_genres".into(), "16".into()),
            Matcher::UrlEncoded("with_original_language".into(), "ja".into()),
            Matcher::UrlEncoded("sort_by".into(), "popularity.desc".into()),
            Matcher::UrlEncoded("page".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"page": 2, "results": [
                {"id": 1429, "name": "Attack on Titan", "first_air_date": "2013-04-07",
                 "overview": "", "poster_path": null, "vote_average": 8.7}
            ], "total_results": 1, "total_pages": 5}"#,
        )
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let page = client.discover_anime(2).await.unwrap();

    mock.assert_async().await;

    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 5);
    assert_eq!(page.results[0].media_type, MediaType::Tv);
}

// =============================================================================
// Movie Detail Tests
// =============================================================================

#[tokio::test]
async fn test_movie_detail_gets_imdb() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "id": 550,
        "imdb_id": "tt0137523",
        "title": "Fight Club",
        "release_date": "1999-10-15",
        "runtime": 139,
        "genres": [
            {"id": 18, "name": "Drama"},
            {"id": 53, "name": "Thriller"}
        ],
        "overview": "An insomniac office worker",
        "vote_average": 8.4,
        "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        "backdrop_path": "/hZkgoQYus5vegHoetLkCJzb17zJ.jpg",
        "external_ids": {
            "imdb_id": "tt0137523"
        }
    }"#;

    let mock = server
        .mock("GET", "/movie/550")
        .match_query(Matcher::UrlEncoded(
            "append_to_response".into(),
            "external_ids".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let detail = client.movie_detail(550).await.unwrap();

    mock.assert_async().await;

    assert_eq!(detail.id, 550);
    assert_eq!(detail.imdb_id.as_deref(), Some("tt0137523"));
    assert_eq!(detail.title, "Fight Club");
    assert_eq!(detail.year, 1999);
    assert_eq!(detail.runtime, 139);
    assert!(detail.genres.contains(&"Drama".to_string()));
}

#[tokio::test]
async fn test_movie_detail_handles_missing_imdb() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "id": 12345,
        "imdb_id": null,
        "title": "Some Movie",
        "release_date": "2023-06-15",
        "runtime": 120,
        "genres": [],
        "overview": "A movie without an IMDb id",
        "vote_average": 5.0,
        "poster_path": null,
        "backdrop_path": null
    }"#;

    let mock = server
        .mock("GET", "/movie/12345")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let detail = client.movie_detail(12345).await.unwrap();

    mock.assert_async().await;

    // Sessions built from this detail fall back to the TMDB id on every
    // mirror
    assert!(detail.imdb_id.is_none());
}

// =============================================================================
// TV Detail Tests
// =============================================================================

#[tokio::test]
async fn test_tv_detail_filters_specials() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "id": 1399,
        "name": "Game of Thrones",
        "first_air_date": "2011-04-17",
        "seasons": [
            {"season_number": 0, "episode_count": 283, "name": "Specials", "air_date": null},
            {"season_number": 1, "episode_count": 10, "name": "Season 1", "air_date": "2011-04-17"},
            {"season_number": 2, "episode_count": 10, "name": "Season 2", "air_date": "2012-04-01"}
        ],
        "genres": [
            {"id": 10765, "name": "Sci-Fi & Fantasy"},
            {"id": 18, "name": "Drama"}
        ],
        "overview": "Seven noble families",
        "vote_average": 8.4,
        "poster_path": null,
        "backdrop_path": null,
        "external_ids": {
            "imdb_id": "tt0944947"
        }
    }"#;

    let mock = server
        .mock("GET", "/tv/1399")
        .match_query(Matcher::UrlEncoded(
            "append_to_response".into(),
            "external_ids".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let detail = client.tv_detail(1399).await.unwrap();

    mock.assert_async().await;

    assert_eq!(detail.id, 1399);
    assert_eq!(detail.imdb_id.as_deref(), Some("tt0944947"));
    assert_eq!(detail.year, 2011);
    // Season 0 (specials) is dropped
    assert_eq!(detail.seasons.len(), 2);
    assert_eq!(detail.seasons[0].season_number, 1);
}

#[tokio::test]
async fn test_tv_season_gets_episodes() {
    let mut server = Server::new_async().await;

    let mock_response = r#"{
        "id": 3624,
        "season_number": 2,
        "episodes": [
            {
                "episode_number": 1,
                "name": "The North Remembers",
                "overview": "Tyrion arrives",
                "runtime": 53,
                "air_date": "2012-04-01"
            },
            {
                "episode_number": 2,
                "name": "The Night Lands",
                "overview": "Arya makes friends",
                "runtime": 54,
                "air_date": "2012-04-08"
            }
        ]
    }"#;

    let mock = server
        .mock("GET", "/tv/1399/season/2")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mock_response)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let episodes = client.tv_season(1399, 2).await.unwrap();

    mock.assert_async().await;

    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].season, 2);
    assert_eq!(episodes[0].episode, 1);
    assert_eq!(episodes[0].name, "The North Remembers");
    assert_eq!(episodes[0].runtime, Some(53));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_handles_rate_limit() {
    let mut server = Server::new_async().await;

    // First request returns 429, second succeeds
    let mock_429 = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("Retry-After", "1")
        .expect(1)
        .create_async()
        .await;

    let mock_200 = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"page": 1, "results": [], "total_results": 0, "total_pages": 0}"#)
        .expect(1)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let result = client.search_movies("test", 1).await;

    assert!(result.is_ok());
    mock_429.assert_async().await;
    mock_200.assert_async().await;
}

#[tokio::test]
async fn test_handles_not_found() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/movie/99999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"success": false, "status_code": 34, "status_message": "The resource could not be found."}"#)
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let result = client.movie_detail(99999999).await;

    mock.assert_async().await;

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.to_string().to_lowercase().contains("not found"));
}

#[tokio::test]
async fn test_handles_server_error() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/trending/all/week")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let result = client.trending("week").await;

    mock.assert_async().await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_handles_invalid_json() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not valid json {{{")
        .create_async()
        .await;

    let client = TmdbClient::with_base_url("test_key", server.url());
    let result = client.search_movies("test", 1).await;

    mock.assert_async().await;

    assert!(result.is_err());
}
