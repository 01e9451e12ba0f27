//! Publication Sync
//!
//! Builds a researcher's publication dataset for a static site. Papers are
//! fetched from the Semantic Scholar Graph API, merged with curated entries,
//! and persisted as a single JSON document. A separate pass fills in missing
//! DOIs from Crossref title search.
//!
//! # Features
//!
//! - **Fallback**: a failed fetch keeps the last good document, or writes an
//!   empty one if none exists
//! - **Atomic**: the document is always replaced as a whole
//! - **Rate-limited**: DOI lookups are spaced by a shared gate
//! - **Conservative matching**: a DOI is only attached when the titles agree
//!
//! # Example
//!
//! ```no_run
//! use publication_sync::{
//!     CacheStore, Config, Pipeline, RecordMerger, SemanticScholarClient, SemanticScholarFetcher,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = SemanticScholarClient::new(&config)?;
//!     let fetcher = SemanticScholarFetcher::new(client, config.author.clone());
//!     let pipeline = Pipeline::new(fetcher, RecordMerger::default(), CacheStore::new(&config.cache_path));
//!
//!     let outcome = pipeline.refresh().await?;
//!     println!("{} publications", outcome.document().count());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod merger;
pub mod models;
pub mod pipeline;
pub mod resolver;
pub mod store;

pub use client::{CrossrefClient, GatePermit, RateGate, SemanticScholarClient};
pub use config::{AuthorLocator, Config};
pub use error::{ClientError, FetchError, LookupError, PipelineError, StoreError};
pub use fetcher::{PublicationSource, SemanticScholarFetcher};
pub use merger::{CuratedEntry, RecordMerger};
pub use pipeline::{Pipeline, RefreshOutcome, resolve_cached};
pub use resolver::{IdentifierResolver, MatchOutcome, MatchThresholds};
pub use store::CacheStore;
