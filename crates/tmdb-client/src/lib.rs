//! HTTP client for the remote movie service.
//!
//! This crate provides:
//! - The `MovieService` trait, the seam the detail fetcher depends on
//! - `TmdbClient`, its implementation over HTTPS with a bearer token
//! - `ClientConfig` for base URL, token, language and timeouts
//! - `FetchError` for transport, status and schema failures
//!
//! Every call is a single attempt: no retries, no backoff.

use async_trait::async_trait;
use catalog::{parser, Movie, MovieId};
use reqwest::header::ACCEPT;
use reqwest::Url;
use tracing::{debug, error, info};

pub mod config;
pub mod error;

pub use config::{ClientConfig, ConfigError};
pub use error::FetchError;

/// Source of movie detail and recommendation records
#[async_trait]
pub trait MovieService: Send + Sync {
    /// Fetch the full record for one movie
    async fn fetch_detail(&self, id: MovieId) -> Result<Movie, FetchError>;

    /// Fetch the first page of movies recommended for `id`.
    ///
    /// An empty page is a success with an empty list.
    async fn fetch_recommendations(&self, id: MovieId) -> Result<Vec<Movie>, FetchError>;
}

/// Client for the movie service's REST API.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl TmdbClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        info!("Creating movie service client for {}", config.base_url);
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build `{base_url}{path}?language=...` plus any extra query pairs
    fn endpoint(&self, path: &str, extra: &[(&str, &str)]) -> Result<Url, FetchError> {
        let raw = format!("{}{}", self.config.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("language", &self.config.language);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_body(&self, url: Url) -> Result<String, FetchError> {
        debug!("GET {}", url.path());
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} failed: {}", url.path(), e);
                FetchError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("{} answered with status {}", url.path(), status);
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.path().to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl MovieService for TmdbClient {
    async fn fetch_detail(&self, id: MovieId) -> Result<Movie, FetchError> {
        let url = self.endpoint(&format!("/movie/{id}"), &[])?;
        let body = self.get_body(url).await?;
        let movie = parser::parse_movie(&body).map_err(|e| {
            error!("Detail response for movie {} is malformed: {}", id, e);
            FetchError::from(e)
        })?;
        debug!("Fetched detail for movie {} ({})", id, movie.title);
        Ok(movie)
    }

    async fn fetch_recommendations(&self, id: MovieId) -> Result<Vec<Movie>, FetchError> {
        let url = self.endpoint(&format!("/movie/{id}/recommendations"), &[("page", "1")])?;
        let body = self.get_body(url).await?;
        let page = parser::parse_recommendations(&body).map_err(|e| {
            error!("Recommendations response for movie {} is malformed: {}", id, e);
            FetchError::from(e)
        })?;
        debug!(
            "Fetched {} recommendations for movie {}",
            page.results.len(),
            id
        );
        Ok(page.results)
    }
}
