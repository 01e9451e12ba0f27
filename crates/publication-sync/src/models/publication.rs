//! Publication records and the persisted cache document.
//!
//! The JSON shape of [`CacheDocument`] is the contract with the site renderer:
//! `{ "fetchedAt": string|null, "count": integer, "publications": [...] }`.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One publication as rendered on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationRecord {
    /// Source paper ID, or a synthetic ID for curated entries.
    pub id: String,

    /// Publication title.
    pub title: String,

    /// Publication year.
    pub year: i32,

    /// Journal, conference or type label ("Patent"); may be empty.
    #[serde(default)]
    pub venue: String,

    /// Digital Object Identifier, once known.
    #[serde(default)]
    pub doi: Option<String>,

    /// Author display names in byline order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Citation count.
    #[serde(default)]
    pub citations: u32,

    /// External link.
    #[serde(default)]
    pub url: Option<String>,
}

impl PublicationRecord {
    /// Whether a DOI has been attached.
    #[must_use]
    pub fn has_doi(&self) -> bool {
        self.doi.as_deref().is_some_and(|d| !d.is_empty())
    }
}

/// Canonical order: newest year first, then most cited.
#[must_use]
pub fn canonical_order(a: &PublicationRecord, b: &PublicationRecord) -> Ordering {
    b.year.cmp(&a.year).then_with(|| b.citations.cmp(&a.citations))
}

/// Sort records into canonical order. Stable for equal keys.
pub fn sort_canonical(records: &mut [PublicationRecord]) {
    records.sort_by(canonical_order);
}

/// The persisted publication dataset.
///
/// `count` always equals `publications.len()`: every constructor recomputes
/// it and mutable access never changes the length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDocument {
    fetched_at: Option<DateTime<Utc>>,
    count: usize,
    publications: Vec<PublicationRecord>,
}

impl CacheDocument {
    /// Create a document from records already in their final order.
    #[must_use]
    pub fn new(fetched_at: Option<DateTime<Utc>>, publications: Vec<PublicationRecord>) -> Self {
        Self { fetched_at, count: publications.len(), publications }
    }

    /// The empty document written when nothing has ever been fetched.
    #[must_use]
    pub fn bootstrap() -> Self {
        Self::new(None, Vec::new())
    }

    /// Time of the last successful fetch; `None` if never.
    #[must_use]
    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Number of publications.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Publications in stored order.
    #[must_use]
    pub fn publications(&self) -> &[PublicationRecord] {
        &self.publications
    }

    /// Mutable access to individual records.
    pub fn publications_mut(&mut self) -> &mut [PublicationRecord] {
        &mut self.publications
    }

    /// Reapply canonical order.
    pub fn sort_canonical(&mut self) {
        sort_canonical(&mut self.publications);
    }

    /// Whether this is the bootstrap document.
    #[must_use]
    pub fn is_bootstrap(&self) -> bool {
        self.fetched_at.is_none() && self.publications.is_empty()
    }

    /// Check the stored `count` against the publication list.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.count == self.publications.len() {
            Ok(())
        } else {
            Err(format!(
                "count is {} but {} publications are stored",
                self.count,
                self.publications.len()
            ))
        }
    }
}
