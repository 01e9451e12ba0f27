//! Error types for the publication sync pipeline.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::path::PathBuf;
use std::time::Duration;

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the remote API (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if this error was a request timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout(),
            Self::Middleware(reqwest_middleware::Error::Reqwest(e)) => e.is_timeout(),
            _ => false,
        }
    }
}

/// The primary source could not deliver the author's papers.
///
/// Always recovered by the orchestrator; never fatal to the process.
#[derive(thiserror::Error, Debug)]
#[error("failed to fetch papers for {author}: {source}")]
pub struct FetchError {
    /// Author that was requested.
    pub author: String,
    /// Underlying client failure.
    #[source]
    pub source: ClientError,
}

/// A title search produced no usable candidate.
///
/// Recovered per record as "not found".
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    /// Transport, status or body failure.
    #[error("lookup request failed: {0}")]
    Client(#[from] ClientError),

    /// The search succeeded but returned no item carrying a DOI.
    #[error("no candidate returned")]
    NoCandidate,
}

impl LookupError {
    /// Whether the search request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Client(e) if e.is_timeout())
    }
}

/// Errors from the cache store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The stored document exists but cannot be trusted.
    #[error("cache document {path} is corrupt: {reason}")]
    Corrupt {
        /// Location of the document
        path: PathBuf,
        /// What failed to parse or validate
        reason: String,
    },

    /// The stored document exists but could not be read.
    #[error("cannot read cache document {path}: {source}")]
    Read {
        /// Location of the document
        path: PathBuf,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The document could not be written.
    #[error("cannot write cache document {path}: {detail}")]
    Persistence {
        /// Location of the document
        path: PathBuf,
        /// What failed
        detail: String,
    },
}

impl StoreError {
    /// Create a corrupt document error.
    #[must_use]
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Corrupt { path: path.into(), reason: reason.into() }
    }

    /// Create a persistence error.
    #[must_use]
    pub fn persistence(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Persistence { path: path.into(), detail: detail.into() }
    }
}

/// Fatal pipeline errors surfaced to the caller.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Cache store failure (corrupt document, unreadable or unwritable file).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid configuration or curated entries.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
