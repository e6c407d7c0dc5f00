//! cinedex - terminal client for TMDB movie and TV listings.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::run_browse;
use crate::tui::state::EMPTY_QUERY_MESSAGE;
use cinedex_api::tmdb::{
    ListingItem, LocalListingApi, MovieCategory, SearchKind, TmdbClient, TvCategory,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movie/TV listings interactively via TUI.
    Browse,
    /// List movies for a category.
    Movies(MoviesArgs),
    /// List TV shows for a category.
    Tv(TvArgs),
    /// Search movies and TV shows.
    Search(SearchArgs),
}

/// Movie category choices.
#[derive(Clone, Copy, ValueEnum)]
enum MovieCategoryArg {
    /// `movie/popular`.
    Popular,
    /// `movie/now_playing`.
    NowPlaying,
    /// `movie/upcoming`.
    Upcoming,
    /// `movie/top_rated`.
    TopRated,
}

impl From<MovieCategoryArg> for MovieCategory {
    fn from(arg: MovieCategoryArg) -> Self {
        match arg {
            MovieCategoryArg::Popular => Self::Popular,
            MovieCategoryArg::NowPlaying => Self::NowPlaying,
            MovieCategoryArg::Upcoming => Self::Upcoming,
            MovieCategoryArg::TopRated => Self::TopRated,
        }
    }
}

/// TV category choices.
#[derive(Clone, Copy, ValueEnum)]
enum TvCategoryArg {
    /// `tv/airing_today`.
    AiringToday,
    /// `tv/on_the_air`.
    OnTheAir,
    /// `tv/popular`.
    Popular,
    /// `tv/top_rated`.
    TopRated,
}

impl From<TvCategoryArg> for TvCategory {
    fn from(arg: TvCategoryArg) -> Self {
        match arg {
            TvCategoryArg::AiringToday => Self::AiringToday,
            TvCategoryArg::OnTheAir => Self::OnTheAir,
            TvCategoryArg::Popular => Self::Popular,
            TvCategoryArg::TopRated => Self::TopRated,
        }
    }
}

/// Search kind choices.
#[derive(Clone, Copy, ValueEnum)]
enum SearchKindArg {
    /// `search/movie`.
    Movie,
    /// `search/tv`.
    Tv,
    /// `search/multi`.
    Multi,
}

impl From<SearchKindArg> for SearchKind {
    fn from(arg: SearchKindArg) -> Self {
        match arg {
            SearchKindArg::Movie => Self::Movie,
            SearchKindArg::Tv => Self::Tv,
            SearchKindArg::Multi => Self::Multi,
        }
    }
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesArgs {
    /// Listing category.
    #[arg(long, value_enum, default_value = "popular")]
    category: MovieCategoryArg,
}

/// Arguments for the `tv` subcommand.
#[derive(clap::Args)]
struct TvArgs {
    /// Listing category.
    #[arg(long, value_enum, default_value = "popular")]
    category: TvCategoryArg,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "James Bond").
    #[arg(long, required = true)]
    query: String,
    /// Result kind (default: "movie").
    #[arg(long, value_enum, default_value = "movie")]
    kind: SearchKindArg,
}

/// Builds a `TmdbClient` from config.toml, with `TMDB_API_KEY` as the
/// key fallback.
///
/// # Errors
///
/// Returns an error if the config is unreadable, no API key is
/// configured, or the client fails to build.
#[instrument(skip_all)]
fn build_client(dir: Option<&PathBuf>) -> Result<TmdbClient> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let api_key = match config.api.key {
        Some(key) => key,
        None => std::env::var("TMDB_API_KEY").context(
            "TMDB API key is required: set [api] key in config.toml or the TMDB_API_KEY environment variable",
        )?,
    };

    let mut builder = TmdbClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(base) = config.api.base_url {
        let url: url::Url = base
            .parse()
            .with_context(|| format!("invalid base_url in config: {base}"))?;
        builder = builder.base_url(url);
    }
    if let Some(image_base) = config.api.image_base {
        builder = builder.image_base(image_base);
    }

    builder.build().context("failed to build TMDB client")
}

/// Prints one listing row per item via tracing.
fn print_items(client: &TmdbClient, items: &[ListingItem]) {
    tracing::info!("ID\tTitle\t\t\tPopularity\tDate\t\tPoster");
    for item in items {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            item.id,
            item.display_title,
            item.popularity,
            item.primary_date.as_deref().unwrap_or("-"),
            item.poster_path
                .as_deref()
                .map_or_else(|| String::from("No Image"), |p| client.poster_url(p)),
        );
    }
    tracing::info!("Total: {} results", items.len());
}

/// Runs the `movies` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_movies(args: &MoviesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir)?;

    let page = client
        .movie_listings(MovieCategory::from(args.category))
        .await
        .context("TMDB movie listing request failed")?;

    print_items(&client, &page.into_items());
    Ok(())
}

/// Runs the `tv` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tv(args: &TvArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_client(dir)?;

    let page = client
        .tv_listings(TvCategory::from(args.category))
        .await
        .context("TMDB tv listing request failed")?;

    print_items(&client, &page.into_items());
    Ok(())
}

/// Runs the `search` subcommand.
///
/// An empty query is rejected before any client or request is built.
///
/// # Errors
///
/// Returns an error on an empty query, a client build failure, or a
/// failed API request.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    if args.query.is_empty() {
        bail!(EMPTY_QUERY_MESSAGE);
    }

    let client = build_client(dir)?;

    let page = client
        .search(SearchKind::from(args.kind), &args.query)
        .await
        .context("TMDB search request failed")?;

    print_items(&client, &page.into_items());
    Ok(())
}

/// Runs the `browse` subcommand.
///
/// The TUI loop blocks its thread; fetches run on the runtime's workers.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
fn run_browse_cmd(dir: Option<&PathBuf>) -> Result<()> {
    let client = Arc::new(build_client(dir)?);
    let handle = tokio::runtime::Handle::current();
    tokio::task::block_in_place(|| run_browse(client, &handle)).context("browse TUI failed")
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Browse => run_browse_cmd(cli.dir.as_ref()),
        Commands::Movies(args) => run_movies(&args, cli.dir.as_ref()).await,
        Commands::Tv(args) => run_tv(&args, cli.dir.as_ref()).await,
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
    }
}
