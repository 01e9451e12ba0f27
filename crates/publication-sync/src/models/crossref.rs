//! Crossref `works` search response, reduced to what DOI lookup needs.

use serde::{Deserialize, Serialize};

/// Envelope of `GET /works`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorksResponse {
    /// Response status ("ok").
    #[serde(default)]
    pub status: Option<String>,

    /// Search payload.
    #[serde(default)]
    pub message: WorksMessage,
}

/// Search payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorksMessage {
    /// Total number of matching works.
    #[serde(default)]
    pub total_results: Option<u64>,

    /// Ranked works, best first.
    #[serde(default)]
    pub items: Vec<Work>,
}

/// A single Crossref work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Work {
    /// Digital Object Identifier.
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,

    /// Titles; the first is the primary title.
    #[serde(default)]
    pub title: Vec<String>,
}

/// Best-ranked search result for a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoiCandidate {
    /// Candidate DOI.
    pub doi: String,
    /// Candidate title, empty when Crossref returned none.
    pub title: String,
}

impl WorksResponse {
    /// Top-ranked item, if it carries a DOI.
    #[must_use]
    pub fn best_candidate(self) -> Option<DoiCandidate> {
        let item = self.message.items.into_iter().next()?;
        let doi = item.doi.filter(|d| !d.is_empty())?;
        Some(DoiCandidate { doi, title: item.title.into_iter().next().unwrap_or_default() })
    }
}
