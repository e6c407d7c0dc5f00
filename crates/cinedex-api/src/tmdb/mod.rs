//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 listing endpoints
//! (`movie/{category}`, `tv/{category}`, `search/{kind}`) and normalizes
//! the returned items into a single displayable shape.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{ListingApi, LocalListingApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{ListingItem, ListingPage, MovieCategory, RawListing, SearchKind, TvCategory};
