//! Combines fetched records with curated entries into the final ordering.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};
use crate::models::{CacheDocument, PublicationRecord, sort_canonical};

/// A hand-maintained work that no API indexes (patents, reports).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CuratedEntry {
    /// Synthetic identifier, e.g. `patent-1`.
    pub id: String,

    /// Title.
    pub title: String,

    /// Year.
    pub year: i32,

    /// Type label shown in place of a venue, e.g. "Patent".
    pub venue: String,

    /// Author display names.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Optional link.
    #[serde(default)]
    pub url: Option<String>,
}

impl CuratedEntry {
    /// Convert into a record. Curated works never carry a DOI or citations.
    #[must_use]
    pub fn to_record(&self) -> PublicationRecord {
        PublicationRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            year: self.year,
            venue: self.venue.clone(),
            doi: None,
            authors: self.authors.clone(),
            citations: 0,
            url: self.url.clone().filter(|u| !u.is_empty()),
        }
    }
}

/// Load curated entries from a JSON array; a missing file yields none.
pub fn load_curated(path: &Path) -> PipelineResult<Vec<CuratedEntry>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No curated entries file");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(PipelineError::config(format!("cannot read {}: {e}", path.display())));
        }
    };

    let entries: Vec<CuratedEntry> = serde_json::from_str(&text)
        .map_err(|e| PipelineError::config(format!("invalid curated entries in {}: {e}", path.display())))?;

    if let Some(bad) = entries.iter().find(|e| e.id.is_empty() || e.title.trim().is_empty()) {
        return Err(PipelineError::config(format!(
            "curated entry {:?} in {} needs a non-empty id and title",
            bad.id,
            path.display()
        )));
    }
    Ok(entries)
}

/// Merges fetched and curated records.
#[derive(Debug, Clone, Default)]
pub struct RecordMerger {
    curated: Vec<CuratedEntry>,
}

impl RecordMerger {
    #[must_use]
    pub const fn new(curated: Vec<CuratedEntry>) -> Self {
        Self { curated }
    }

    /// Ids of the curated entries.
    pub fn curated_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.curated.iter().map(|e| e.id.clone())
    }

    /// Produce the final record sequence.
    ///
    /// Curated entries follow the fetched records, the first record wins for
    /// a repeated id, DOIs known in `prior` are carried over to fresh records
    /// that lack one, and the result is in canonical order.
    #[must_use]
    pub fn merge(
        &self,
        fetched: Vec<PublicationRecord>,
        prior: Option<&CacheDocument>,
    ) -> Vec<PublicationRecord> {
        let known_dois: HashMap<&str, &str> = prior
            .map(|doc| {
                doc.publications()
                    .iter()
                    .filter_map(|r| r.doi.as_deref().filter(|d| !d.is_empty()).map(|d| (r.id.as_str(), d)))
                    .collect()
            })
            .unwrap_or_default();

        let mut seen = HashSet::new();
        let mut carried = 0usize;
        let mut records: Vec<PublicationRecord> = fetched
            .into_iter()
            .chain(self.curated.iter().map(CuratedEntry::to_record))
            .filter(|r| {
                let fresh = seen.insert(r.id.clone());
                if !fresh {
                    tracing::debug!(id = %r.id, "Dropping duplicate record");
                }
                fresh
            })
            .map(|mut r| {
                if !r.has_doi() {
                    if let Some(doi) = known_dois.get(r.id.as_str()) {
                        r.doi = Some((*doi).to_string());
                        carried += 1;
                    }
                }
                r
            })
            .collect();

        sort_canonical(&mut records);
        tracing::debug!(total = records.len(), curated = self.curated.len(), carried, "Merged records");
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, year: i32, citations: u32) -> PublicationRecord {
        PublicationRecord {
            id: id.to_string(),
            title: format!("Paper {id}"),
            year,
            venue: "Journal".to_string(),
            doi: None,
            authors: vec![],
            citations,
            url: None,
        }
    }

    fn patent(id: &str, year: i32) -> CuratedEntry {
        CuratedEntry {
            id: id.to_string(),
            title: format!("Patent {id}"),
            year,
            venue: "Patent".to_string(),
            authors: vec!["Inventor".to_string()],
            url: None,
        }
    }

    #[test]
    fn test_merge_order() {
        let merger = RecordMerger::new(vec![patent("patent-1", 2016), patent("patent-2", 2015)]);
        let merged = merger.merge(
            vec![record("a", 2020, 1), record("b", 2019, 5), record("c", 2019, 10)],
            None,
        );

        let keys: Vec<_> = merged.iter().map(|r| (r.year, r.citations, r.id.as_str())).collect();
        assert_eq!(
            keys,
            vec![(2020, 1, "a"), (2019, 10, "c"), (2019, 5, "b"), (2016, 0, "patent-1"), (2015, 0, "patent-2")]
        );
    }

    #[test]
    fn test_curated_fields() {
        let merged = RecordMerger::new(vec![patent("patent-1", 2016)]).merge(vec![], None);
        assert_eq!(merged[0].venue, "Patent");
        assert_eq!(merged[0].doi, None);
        assert_eq!(merged[0].citations, 0);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut dup = record("a", 2010, 99);
        dup.title = "Duplicate".to_string();
        let merged = RecordMerger::default().merge(vec![record("a", 2020, 1), dup], None);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Paper a");
    }

    #[test]
    fn test_prior_doi_carried_over() {
        let mut resolved = record("a", 2020, 1);
        resolved.doi = Some("10.1/resolved".to_string());
        let prior = CacheDocument::new(None, vec![resolved]);

        let mut fresh_with_doi = record("b", 2020, 0);
        fresh_with_doi.doi = Some("10.1/api".to_string());

        let merged = RecordMerger::default().merge(vec![record("a", 2020, 3), fresh_with_doi], Some(&prior));
        assert_eq!(merged[0].doi.as_deref(), Some("10.1/resolved"));
        assert_eq!(merged[1].doi.as_deref(), Some("10.1/api"));
    }

    #[test]
    fn test_load_curated_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_curated(&dir.path().join("none.json")).unwrap().is_empty());
    }

    #[test]
    fn test_load_curated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curated.json");
        std::fs::write(
            &path,
            r#"[{"id": "patent-1", "title": "Wrist mechanism", "year": 2016, "venue": "Patent", "authors": ["A"], "url": ""}]"#,
        )
        .unwrap();

        let entries = load_curated(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].to_record().url, None);
    }

    #[test]
    fn test_load_curated_rejects_empty_title() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curated.json");
        std::fs::write(&path, r#"[{"id": "x", "title": "", "year": 2016, "venue": "Patent"}]"#).unwrap();
        assert!(matches!(load_curated(&path), Err(PipelineError::Config(_))));
    }
}
