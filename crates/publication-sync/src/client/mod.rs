//! HTTP clients for the upstream bibliographic APIs.
//!
//! - [`SemanticScholarClient`]: author papers from the Graph API, with retry
//!   middleware and exponential backoff
//! - [`CrossrefClient`]: single-result title search for DOI lookup
//! - [`RateGate`]: idle interval after each lookup

mod crossref;
mod middleware;

use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{AuthorLocator, Config, api, fields};
use crate::error::{ClientError, ClientResult};
use crate::models::AuthorPapers;

pub use crossref::CrossrefClient;
pub use middleware::{GatePermit, RateGate};

/// Semantic Scholar Graph API client.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// API key (optional).
    api_key: Option<String>,

    /// Graph API base URL.
    graph_api_url: String,
}

impl SemanticScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(ref key) = config.api_key {
            headers.insert("x-api-key", key.parse()?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            graph_api_url: config.graph_api_url.clone(),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Get every paper of an author in one request.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status or a malformed body.
    pub async fn get_author_papers(&self, author: &AuthorLocator) -> ClientResult<AuthorPapers> {
        let url = format!("{}/author/{}", self.graph_api_url, author.path_segment());
        let params = vec![("fields".to_string(), fields::AUTHOR_PAPERS.join(","))];

        let response = self.client.get(&url).query(&params).send().await?;
        let response = handle_response(response).await?;

        // Read as text first so a malformed body surfaces as a parse error.
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(ClientError::from)
    }
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient")
            .field("graph_api_url", &self.graph_api_url)
            .field("has_api_key", &self.has_api_key())
            .finish()
    }
}

/// Map non-success status codes to [`ClientError`].
pub(crate) async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            Err(ClientError::rate_limited(retry_after))
        }
        404 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::not_found(text))
        }
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}
