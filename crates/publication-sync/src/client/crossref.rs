//! Crossref title search client.

use reqwest::Client;

use super::handle_response;
use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{DoiCandidate, WorksResponse};

/// Crossref REST API client.
///
/// No retry middleware: a failed lookup is simply "not found" and the next
/// pass tries again.
#[derive(Clone)]
pub struct CrossrefClient {
    client: Client,
    base_url: String,
    mailto: Option<String>,
    author_hint: Option<String>,
}

impl CrossrefClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.lookup_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.crossref_api_url.clone(),
            mailto: config.crossref_mailto.clone(),
            author_hint: config.author_hint.clone(),
        })
    }

    /// Search works by title and return the best-ranked item.
    ///
    /// # Errors
    ///
    /// Returns error on timeout, transport failure, non-success status or a
    /// malformed body. `Ok(None)` means the search returned no item with a DOI.
    pub async fn search_title(&self, title: &str) -> ClientResult<Option<DoiCandidate>> {
        let url = format!("{}/works", self.base_url);

        let mut params = vec![
            ("query.title".to_string(), title.to_string()),
            ("rows".to_string(), "1".to_string()),
        ];
        if let Some(hint) = &self.author_hint {
            params.push(("query.author".to_string(), hint.clone()));
        }
        if let Some(mailto) = &self.mailto {
            params.push(("mailto".to_string(), mailto.clone()));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        let response = handle_response(response).await?;
        let body = response.text().await?;
        let works: WorksResponse = serde_json::from_str(&body).map_err(ClientError::from)?;

        Ok(works.best_candidate())
    }
}

impl std::fmt::Debug for CrossrefClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossrefClient")
            .field("base_url", &self.base_url)
            .field("author_hint", &self.author_hint)
            .finish()
    }
}
