//! Configuration for the publication sync pipeline.

use std::path::PathBuf;
use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Semantic Scholar Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Crossref REST API endpoint.
    pub const CROSSREF_API: &str = "https://api.crossref.org";

    /// Request timeout for the author papers fetch.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Request timeout for a single Crossref title search.
    pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Minimum spacing between Crossref requests (2 req/s).
    pub const LOOKUP_INTERVAL: Duration = Duration::from_millis(500);

    /// Retries for transient Semantic Scholar failures.
    pub const MAX_RETRIES: u32 = 3;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 4;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Paper field sets for API requests.
pub mod fields {
    /// Fields requested for every paper of an author.
    pub const AUTHOR_PAPERS: &[&str] = &[
        "papers.title",
        "papers.year",
        "papers.venue",
        "papers.publicationVenue",
        "papers.externalIds",
        "papers.authors",
        "papers.citationCount",
        "papers.url",
    ];
}

/// Title matching thresholds for DOI acceptance.
pub mod matching {
    /// Leading characters that must be identical for a prefix match.
    pub const PREFIX_CHARS: usize = 40;

    /// Leading query-title tokens considered for the overlap match.
    pub const WINDOW_TOKENS: usize = 6;

    /// Window tokens that must appear in the candidate title.
    pub const MIN_TOKEN_HITS: usize = 4;
}

/// Default locations and identities.
pub mod defaults {
    /// Persisted dataset consumed by the site.
    pub const CACHE_PATH: &str = "src/content/publications-cache.json";

    /// Hand-maintained entries that the APIs do not index.
    pub const CURATED_PATH: &str = "data/curated.json";

    /// Semantic Scholar author id used when nothing else is configured.
    pub const AUTHOR_ID: &str = "66470460";

    /// Surname passed to Crossref as `query.author`.
    pub const AUTHOR_HINT: &str = "Shrestha";
}

/// How the author is located in Semantic Scholar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorLocator {
    /// Native Semantic Scholar author id.
    SemanticScholar(String),
    /// ORCID iD, resolved by Semantic Scholar's `ORCID:` lookup.
    Orcid(String),
}

impl AuthorLocator {
    /// Path segment identifying the author in the Graph API.
    #[must_use]
    pub fn path_segment(&self) -> String {
        match self {
            Self::SemanticScholar(id) => id.clone(),
            Self::Orcid(orcid) => format!("ORCID:{orcid}"),
        }
    }
}

impl std::fmt::Display for AuthorLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SemanticScholar(id) => write!(f, "author {id}"),
            Self::Orcid(orcid) => write!(f, "ORCID {orcid}"),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// Author whose papers are fetched.
    pub author: AuthorLocator,

    /// Base URL for Graph API (for testing with mock servers).
    pub graph_api_url: String,

    /// Base URL for Crossref (for testing with mock servers).
    pub crossref_api_url: String,

    /// Contact address for Crossref's polite pool.
    pub crossref_mailto: Option<String>,

    /// Author surname hint for title searches.
    pub author_hint: Option<String>,

    /// Location of the persisted dataset.
    pub cache_path: PathBuf,

    /// Location of curated entries.
    pub curated_path: PathBuf,

    /// Request timeout for the author fetch.
    pub request_timeout: Duration,

    /// Request timeout for each title search.
    pub lookup_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Minimum spacing between title searches.
    pub lookup_interval: Duration,

    /// Retries for transient fetch failures.
    pub max_retries: u32,
}

impl Config {
    /// Create a configuration for the given author with production endpoints.
    #[must_use]
    pub fn new(author: AuthorLocator, api_key: Option<String>) -> Self {
        Self {
            api_key,
            author,
            graph_api_url: api::GRAPH_API.to_string(),
            crossref_api_url: api::CROSSREF_API.to_string(),
            crossref_mailto: None,
            author_hint: Some(defaults::AUTHOR_HINT.to_string()),
            cache_path: PathBuf::from(defaults::CACHE_PATH),
            curated_path: PathBuf::from(defaults::CURATED_PATH),
            request_timeout: api::REQUEST_TIMEOUT,
            lookup_timeout: api::LOOKUP_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            lookup_interval: api::LOOKUP_INTERVAL,
            max_retries: api::MAX_RETRIES,
        }
    }

    /// Create a test configuration with custom URLs for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            author: AuthorLocator::SemanticScholar("12345".to_string()),
            graph_api_url: format!("{}/graph/v1", base_url),
            crossref_api_url: base_url.to_string(),
            crossref_mailto: None,
            author_hint: None,
            cache_path: PathBuf::from("publications-cache.json"),
            curated_path: PathBuf::from("curated.json"),
            request_timeout: Duration::from_secs(5),
            lookup_timeout: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(2),
            lookup_interval: Duration::from_millis(0), // No delay in tests
            max_retries: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// `AUTHOR_ORCID` wins over `SEMANTIC_SCHOLAR_AUTHOR_ID` when both are set.
    pub fn from_env() -> anyhow::Result<Self> {
        let author = match std::env::var("AUTHOR_ORCID") {
            Ok(orcid) if !orcid.trim().is_empty() => AuthorLocator::Orcid(orcid.trim().to_string()),
            _ => AuthorLocator::SemanticScholar(
                std::env::var("SEMANTIC_SCHOLAR_AUTHOR_ID")
                    .unwrap_or_else(|_| defaults::AUTHOR_ID.to_string()),
            ),
        };
        if let AuthorLocator::SemanticScholar(id) = &author {
            if id.trim().is_empty() {
                anyhow::bail!("SEMANTIC_SCHOLAR_AUTHOR_ID is set but empty");
            }
        }

        let mut config = Self::new(author, std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok());
        if let Ok(path) = std::env::var("PUBLICATIONS_CACHE_PATH") {
            config.cache_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("PUBLICATIONS_CURATED_PATH") {
            config.curated_path = PathBuf::from(path);
        }
        if let Ok(hint) = std::env::var("CROSSREF_AUTHOR_HINT") {
            config.author_hint = Some(hint).filter(|h| !h.trim().is_empty());
        }
        config.crossref_mailto = std::env::var("CROSSREF_MAILTO").ok();
        Ok(config)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(AuthorLocator::SemanticScholar(defaults::AUTHOR_ID.to_string()), None)
    }
}
