//! TMDB API response types, item normalization, and category enumerations.

use serde::Deserialize;

// --- Categories ---

/// Movie listing category (`movie/{category}` path segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieCategory {
    /// `movie/popular`.
    Popular,
    /// `movie/now_playing`.
    NowPlaying,
    /// `movie/upcoming`.
    Upcoming,
    /// `movie/top_rated`.
    TopRated,
}

impl MovieCategory {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [Self::Popular, Self::NowPlaying, Self::Upcoming, Self::TopRated];

    /// URL path segment for this category.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::NowPlaying => "now_playing",
            Self::Upcoming => "upcoming",
            Self::TopRated => "top_rated",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popular => "Popular",
            Self::NowPlaying => "Now Playing",
            Self::Upcoming => "Upcoming",
            Self::TopRated => "Top Rated",
        }
    }
}

/// TV listing category (`tv/{category}` path segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvCategory {
    /// `tv/airing_today`.
    AiringToday,
    /// `tv/on_the_air`.
    OnTheAir,
    /// `tv/popular`.
    Popular,
    /// `tv/top_rated`.
    TopRated,
}

impl TvCategory {
    /// All categories in display order.
    pub const ALL: [Self; 4] = [Self::AiringToday, Self::OnTheAir, Self::Popular, Self::TopRated];

    /// URL path segment for this category.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::AiringToday => "airing_today",
            Self::OnTheAir => "on_the_air",
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AiringToday => "Airing Today",
            Self::OnTheAir => "On The Air",
            Self::Popular => "Popular",
            Self::TopRated => "Top Rated",
        }
    }
}

/// Search result kind (`search/{kind}` path segment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// `search/movie`.
    Movie,
    /// `search/tv`.
    Tv,
    /// `search/multi` (movies and TV mixed).
    Multi,
}

impl SearchKind {
    /// All kinds in display order.
    pub const ALL: [Self; 3] = [Self::Movie, Self::Tv, Self::Multi];

    /// URL path segment for this kind.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
            Self::Multi => "multi",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Tv => "TV",
            Self::Multi => "Multi",
        }
    }
}

// --- Wire types ---

/// Response from any listing endpoint.
///
/// Only `results` is consumed; a missing field deserializes to an empty
/// list rather than an error.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPage {
    /// Listed items, in upstream order.
    #[serde(default)]
    pub results: Vec<RawListing>,
}

impl ListingPage {
    /// Normalizes all raw items, preserving upstream order.
    #[must_use]
    pub fn into_items(self) -> Vec<ListingItem> {
        self.results.into_iter().map(ListingItem::from).collect()
    }
}

/// A single raw item as returned by TMDB.
///
/// Movies carry `title`/`release_date`, TV series carry
/// `name`/`first_air_date`; `search/multi` responses mix both.
#[derive(Debug, Clone, Deserialize)]
pub struct RawListing {
    /// TMDB ID (unique within one response only).
    pub id: u64,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// TV series name.
    #[serde(default)]
    pub name: Option<String>,
    /// Relative poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Movie release date (YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// TV first air date (YYYY-MM-DD).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Synopsis text.
    #[serde(default)]
    pub overview: Option<String>,
}

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
}

// --- Normalized item ---

/// Shown when an item has neither `title` nor `name`.
const UNTITLED: &str = "(untitled)";

/// One displayable movie/TV/search item, normalized from [`RawListing`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingItem {
    /// TMDB ID (unique within one fetch result only).
    pub id: u64,
    /// Primary label: movie title or TV series name.
    pub display_title: String,
    /// Relative poster path; `None` renders a placeholder.
    pub poster_path: Option<String>,
    /// Popularity score (display only).
    pub popularity: f64,
    /// Release date or first air date, whichever the item carries.
    pub primary_date: Option<String>,
    /// Synopsis, possibly empty.
    pub overview: String,
}

impl From<RawListing> for ListingItem {
    fn from(raw: RawListing) -> Self {
        Self {
            id: raw.id,
            display_title: raw
                .title
                .or(raw.name)
                .unwrap_or_else(|| String::from(UNTITLED)),
            poster_path: raw.poster_path,
            popularity: raw.popularity,
            primary_date: raw.release_date.or(raw.first_air_date),
            overview: raw.overview.unwrap_or_default(),
        }
    }
}
