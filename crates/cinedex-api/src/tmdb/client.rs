//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalListingApi;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{ListingPage, MovieCategory, SearchKind, TmdbErrorResponse, TvCategory};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default base URL for poster images (w500 rendition).
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// TMDB API client.
///
/// Issues exactly one outbound GET per call; failures are returned to the
/// caller, never retried here.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Base URL prefix for poster images.
    image_base: String,
    /// API key, sent as the `api_key` query parameter.
    api_key: String,
    /// Request pacer.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    image_base: Option<String>,
    api_key: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            image_base: None,
            api_key: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the poster image base URL.
    #[must_use]
    pub fn image_base(mut self, base: impl Into<String>) -> Self {
        self.image_base = Some(base.into());
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let image_base = self
            .image_base
            .unwrap_or_else(|| String::from(DEFAULT_IMAGE_BASE_URL));

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            image_base,
            api_key,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Base URL prefix for poster images.
    #[must_use]
    pub fn image_base(&self) -> &str {
        &self.image_base
    }

    /// Builds the full poster URL for a relative poster path.
    ///
    /// Callers must only pass paths from items that actually carry one; an
    /// absent `poster_path` renders a placeholder and never reaches here.
    #[must_use]
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{poster_path}", self.image_base)
    }

    /// Sends one GET request with the `api_key` query parameter and pacing,
    /// then decodes the listing payload.
    #[instrument(skip_all)]
    async fn get_listings(&self, path: &str, query: &[(&str, String)]) -> Result<ListingPage> {
        self.rate_limiter.lock().await.wait().await;

        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let request = self
            .http_client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
                bail!(
                    "TMDB API error (HTTP {}): code={}, message={}",
                    status,
                    error_response.status_code,
                    error_response.status_message,
                );
            }
            bail!("TMDB API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<ListingPage, _> = serde_json::from_str(&body);
        raw_result.with_context(|| format!("failed to decode JSON response: {path}"))
    }
}

impl LocalListingApi for TmdbClient {
    #[instrument(skip_all)]
    async fn movie_listings(&self, category: MovieCategory) -> Result<ListingPage> {
        let path = format!("movie/{}", category.segment());
        self.get_listings(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn tv_listings(&self, category: TvCategory) -> Result<ListingPage> {
        let path = format!("tv/{}", category.segment());
        self.get_listings(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn search(&self, kind: SearchKind, query: &str) -> Result<ListingPage> {
        let path = format!("search/{}", kind.segment());
        let params = [("query", String::from(query))];
        self.get_listings(&path, &params).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::float_cmp)]

    use super::*;

    /// One-movie `top_rated` payload used across the wiremock tests.
    const TOP_RATED_BODY: &str = r#"{
        "page": 1,
        "results": [
            {
                "id": 1,
                "title": "X",
                "popularity": 9.1,
                "release_date": "2020-01-01",
                "overview": "...",
                "poster_path": "/x.jpg"
            }
        ],
        "total_pages": 1,
        "total_results": 1
    }"#;

    fn test_client(mock_uri: &str) -> TmdbClient {
        let base_url = format!("{mock_uri}/3/");
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        // Arrange & Act
        let result = TmdbClient::builder().user_agent("test/0.0.0").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key is required")
        );
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_key("test-key").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_with_required_fields_succeeds() {
        // Arrange & Act
        let result = TmdbClient::builder()
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build();

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_poster_url_concatenates_image_base() {
        // Arrange
        let client = TmdbClient::builder()
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let url = client.poster_url("/x.jpg");

        // Assert
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/x.jpg");
    }

    #[test]
    fn test_poster_url_with_custom_image_base() {
        // Arrange
        let client = TmdbClient::builder()
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .image_base("http://localhost:9000/img")
            .build()
            .unwrap();

        // Act & Assert
        assert_eq!(client.poster_url("/a.png"), "http://localhost:9000/img/a.png");
    }

    #[tokio::test]
    async fn test_movie_listings_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/movie/top_rated"))
            .and(wiremock::matchers::query_param("api_key", "test-key"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(TOP_RATED_BODY))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let page = client.movie_listings(MovieCategory::TopRated).await.unwrap();

        // Assert
        let items = page.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].display_title, "X");
        assert_eq!(items[0].popularity, 9.1);
        assert_eq!(items[0].primary_date.as_deref(), Some("2020-01-01"));
        assert_eq!(items[0].poster_path.as_deref(), Some("/x.jpg"));
    }

    #[tokio::test]
    async fn test_tv_listings_via_http() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let body = r#"{"results": [{"id": 5, "name": "S", "popularity": 1.0, "first_air_date": "2021-02-02", "overview": "tv", "poster_path": null}]}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/tv/airing_today"))
            .and(wiremock::matchers::query_param("api_key", "test-key"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let page = client.tv_listings(TvCategory::AiringToday).await.unwrap();

        // Assert
        let items = page.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].display_title, "S");
        assert!(items[0].poster_path.is_none());
    }

    #[tokio::test]
    async fn test_search_sends_query_param() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/multi"))
            .and(wiremock::matchers::query_param("api_key", "test-key"))
            .and(wiremock::matchers::query_param("query", "James Bond"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string(r#"{"results": []}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let page = client.search(SearchKind::Multi, "James Bond").await.unwrap();

        // Assert
        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_returns_tmdb_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let error_body = r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(401).set_body_string(error_body))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let result = client.movie_listings(MovieCategory::Popular).await;

        // Assert
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("TMDB API error"));
        assert!(err.contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_http_error_without_json_body() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(500).set_body_string("internal server error"),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let result = client.tv_listings(TvCategory::Popular).await;

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_an_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let result = client.search(SearchKind::Movie, "x").await;

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("failed to decode JSON response")
        );
    }

    #[tokio::test]
    async fn test_missing_results_field_yields_empty_page() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(r#"{"page": 1, "total_results": 0}"#),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let page = client.movie_listings(MovieCategory::Upcoming).await.unwrap();

        // Assert
        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        // Arrange: expect(1) fails the test if the client re-issues the request
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());

        // Act
        let result = client.movie_listings(MovieCategory::Popular).await;

        // Assert
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_rate_limiter_enforces_interval() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string(r#"{"results": []}"#),
            )
            .expect(2)
            .mount(&mock_server)
            .await;

        let base_url = format!("{}/3/", mock_server.uri());
        let client = TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        // Act
        let start = std::time::Instant::now();
        client.movie_listings(MovieCategory::Popular).await.unwrap();
        client.movie_listings(MovieCategory::Popular).await.unwrap();
        let elapsed = start.elapsed();

        // Assert: at least 100ms interval between two requests
        assert!(elapsed >= Duration::from_millis(100));
    }
}
