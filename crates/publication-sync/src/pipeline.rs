//! Pipeline orchestration: refresh with fallback, and the DOI resolution pass.

use chrono::Utc;

use crate::error::{PipelineResult, StoreError};
use crate::fetcher::PublicationSource;
use crate::merger::RecordMerger;
use crate::models::CacheDocument;
use crate::resolver::{DoiLookup, IdentifierResolver, ResolutionReport};
use crate::store::CacheStore;

/// How a refresh ended. Every variant carries the document now in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh data was fetched, merged and saved.
    Refreshed(CacheDocument),
    /// The fetch failed; the existing document was left untouched.
    StaleFallback(CacheDocument),
    /// The fetch failed and nothing was stored; the empty document was saved.
    Bootstrapped(CacheDocument),
}

impl RefreshOutcome {
    /// The document in the store after the refresh.
    #[must_use]
    pub const fn document(&self) -> &CacheDocument {
        match self {
            Self::Refreshed(doc) | Self::StaleFallback(doc) | Self::Bootstrapped(doc) => doc,
        }
    }

    /// Whether new data was written.
    #[must_use]
    pub const fn is_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed(_))
    }
}

/// Fetch, merge and persist; the only writer of the primary dataset.
#[derive(Debug)]
pub struct Pipeline<S> {
    source: S,
    merger: RecordMerger,
    store: CacheStore,
}

impl<S: PublicationSource> Pipeline<S> {
    #[must_use]
    pub const fn new(source: S, merger: RecordMerger, store: CacheStore) -> Self {
        Self { source, merger, store }
    }

    /// Run one refresh cycle.
    ///
    /// A failed fetch is logged and recovered; only store failures are
    /// returned as errors. A corrupt existing document is fatal when the fetch
    /// failed, and is replaced when it succeeded. Nothing is written
    /// unless the complete new dataset, or the bootstrap document, is ready.
    pub async fn refresh(&self) -> PipelineResult<RefreshOutcome> {
        tracing::info!(source = %self.source.describe(), "Fetching publications");

        match self.source.fetch().await {
            Ok(fetched) => {
                let prior = match self.store.load() {
                    Ok(prior) => prior,
                    // Fresh data replaces a corrupt document; only its DOIs are lost.
                    Err(e @ StoreError::Corrupt { .. }) => {
                        tracing::warn!(error = %e, "Ignoring corrupt cache, no DOIs carried over");
                        None
                    }
                    Err(e) => return Err(e.into()),
                };
                let publications = self.merger.merge(fetched, prior.as_ref());
                let doc = CacheDocument::new(Some(Utc::now()), publications);
                self.store.save(&doc)?;
                tracing::info!(
                    count = doc.count(),
                    path = %self.store.path().display(),
                    "Wrote publications cache"
                );
                Ok(RefreshOutcome::Refreshed(doc))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch publications");
                match self.store.load()? {
                    Some(existing) => {
                        tracing::info!(count = existing.count(), "Using existing cache");
                        Ok(RefreshOutcome::StaleFallback(existing))
                    }
                    None => {
                        let doc = self.store.bootstrap()?;
                        tracing::info!(path = %self.store.path().display(), "Wrote empty cache");
                        Ok(RefreshOutcome::Bootstrapped(doc))
                    }
                }
            }
        }
    }
}

/// Run a resolution pass over the stored document and save the result.
///
/// Returns `None` without writing when nothing is stored yet. Must not run
/// concurrently with a refresh against the same store.
pub async fn resolve_cached<L: DoiLookup>(
    store: &CacheStore,
    resolver: &IdentifierResolver<L>,
) -> PipelineResult<Option<ResolutionReport>> {
    let Some(mut doc) = store.load()? else {
        tracing::warn!(path = %store.path().display(), "No cache document to resolve");
        return Ok(None);
    };

    let report = resolver.resolve(&mut doc).await;
    doc.sort_canonical();
    store.save(&doc)?;

    tracing::info!(
        with_doi = report.with_doi(),
        total = doc.count(),
        path = %store.path().display(),
        "Wrote resolved cache"
    );
    Ok(Some(report))
}
