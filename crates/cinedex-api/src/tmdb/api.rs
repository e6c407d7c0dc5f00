//! `ListingApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{ListingPage, MovieCategory, SearchKind, TvCategory};

/// TMDB listing API trait.
///
/// Abstracts the three listing operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(ListingApi: Send)]
pub trait LocalListingApi {
    /// Fetches one page of movie listings for a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_listings(&self, category: MovieCategory) -> Result<ListingPage>;

    /// Fetches one page of TV listings for a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_listings(&self, category: TvCategory) -> Result<ListingPage>;

    /// Searches movies, TV series, or both.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search(&self, kind: SearchKind, query: &str) -> Result<ListingPage>;
}
