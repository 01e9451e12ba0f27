//! Bibliographic fetcher: author papers from Semantic Scholar, normalized
//! into [`PublicationRecord`]s.

use crate::client::SemanticScholarClient;
use crate::config::AuthorLocator;
use crate::error::FetchError;
use crate::models::{Paper, PublicationRecord};

/// A source of normalized publication records.
#[async_trait::async_trait]
pub trait PublicationSource: Send + Sync {
    /// Human-readable description of what is fetched, for logs.
    fn describe(&self) -> String;

    /// Fetch every record. Fails as a unit; no partial results.
    async fn fetch(&self) -> Result<Vec<PublicationRecord>, FetchError>;
}

/// Fetches one author's papers from the Graph API.
#[derive(Debug, Clone)]
pub struct SemanticScholarFetcher {
    client: SemanticScholarClient,
    author: AuthorLocator,
}

impl SemanticScholarFetcher {
    #[must_use]
    pub const fn new(client: SemanticScholarClient, author: AuthorLocator) -> Self {
        Self { client, author }
    }
}

#[async_trait::async_trait]
impl PublicationSource for SemanticScholarFetcher {
    fn describe(&self) -> String {
        self.author.to_string()
    }

    async fn fetch(&self) -> Result<Vec<PublicationRecord>, FetchError> {
        let response = self
            .client
            .get_author_papers(&self.author)
            .await
            .map_err(|source| FetchError { author: self.describe(), source })?;

        let raw = response.papers.len();
        let records = normalize(response.papers);
        tracing::info!(
            author = %self.author,
            raw,
            kept = records.len(),
            "Fetched papers from Semantic Scholar"
        );
        Ok(records)
    }
}

/// Normalize raw papers, dropping any without an id, title or year.
#[must_use]
pub fn normalize(papers: Vec<Paper>) -> Vec<PublicationRecord> {
    papers.into_iter().filter_map(normalize_paper).collect()
}

/// Map one raw paper, or `None` if it cannot be retained.
#[must_use]
pub fn normalize_paper(paper: Paper) -> Option<PublicationRecord> {
    let title = paper.title.clone().filter(|t| !t.trim().is_empty())?;
    let Some(year) = paper.year else {
        tracing::debug!(paper_id = %paper.paper_id, "Dropping paper without year");
        return None;
    };
    if paper.paper_id.is_empty() {
        tracing::debug!(title = %title, "Dropping paper without id");
        return None;
    }

    Some(PublicationRecord {
        venue: paper.venue_name().to_string(),
        doi: paper.doi().map(str::to_string),
        authors: paper.author_names(),
        citations: paper.citations(),
        url: paper.url.filter(|u| !u.is_empty()),
        id: paper.paper_id,
        title,
        year,
    })
}
