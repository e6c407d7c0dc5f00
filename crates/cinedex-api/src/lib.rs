//! API client library for cinedex.
//!
//! Provides a client for the TMDB v3 API: category listings for movies and
//! TV series, and free-text search.

/// TMDB API client.
pub mod tmdb;
