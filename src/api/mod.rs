//! API clients for external metadata services

pub mod tmdb;

pub use tmdb::{TmdbClient, TmdbError};
