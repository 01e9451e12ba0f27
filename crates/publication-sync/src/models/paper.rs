//! Paper data model matching the Semantic Scholar author papers schema.

use serde::{Deserialize, Serialize};

/// Response of `GET /author/{id}?fields=papers.*`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPapers {
    /// Semantic Scholar author ID.
    #[serde(default)]
    pub author_id: Option<String>,

    /// All papers attributed to the author.
    #[serde(default)]
    pub papers: Vec<Paper>,
}

/// A research paper from Semantic Scholar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Unique Semantic Scholar paper ID.
    #[serde(default)]
    pub paper_id: String,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Free-text publication venue.
    #[serde(default)]
    pub venue: Option<String>,

    /// Structured publication venue.
    #[serde(default)]
    pub publication_venue: Option<PublicationVenue>,

    /// External identifiers (DOI, ArXiv, etc.).
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,

    /// List of authors.
    #[serde(default)]
    pub authors: Vec<AuthorRef>,

    /// Number of citations this paper has received.
    #[serde(default)]
    pub citation_count: Option<i32>,

    /// Semantic Scholar page for the paper.
    #[serde(default)]
    pub url: Option<String>,
}

impl Paper {
    /// Get the DOI if available.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.external_ids.as_ref()?.doi.as_deref().filter(|d| !d.is_empty())
    }

    /// Structured venue name, then free-text venue, then empty.
    #[must_use]
    pub fn venue_name(&self) -> &str {
        self.publication_venue
            .as_ref()
            .and_then(|v| v.name.as_deref())
            .filter(|name| !name.is_empty())
            .or_else(|| self.venue.as_deref().filter(|v| !v.is_empty()))
            .unwrap_or("")
    }

    /// Get citation count, treating missing or negative values as 0.
    #[must_use]
    pub fn citations(&self) -> u32 {
        self.citation_count.map_or(0, |c| c.max(0) as u32)
    }

    /// Author display names in byline order.
    #[must_use]
    pub fn author_names(&self) -> Vec<String> {
        self.authors.iter().filter_map(|a| a.name.clone()).collect()
    }
}

/// Structured venue information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicationVenue {
    /// Venue ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Venue display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// External identifiers for a paper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalIds {
    /// Digital Object Identifier.
    #[serde(rename = "DOI")]
    pub doi: Option<String>,

    /// ArXiv preprint ID.
    #[serde(rename = "ArXiv")]
    pub arxiv: Option<String>,
}

/// Author reference as embedded in a paper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    /// Semantic Scholar author ID.
    #[serde(default)]
    pub author_id: Option<String>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_deserialize_minimal() {
        let json = r#"{"paperId": "abc123"}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.paper_id, "abc123");
        assert!(paper.title.is_none());
        assert!(paper.authors.is_empty());
        assert_eq!(paper.venue_name(), "");
    }

    #[test]
    fn test_paper_deserialize_full() {
        let json = r#"{
            "paperId": "abc123",
            "title": "Test Paper",
            "year": 2024,
            "venue": "Proc. Test",
            "publicationVenue": {"id": "v1", "name": "Journal of Tests"},
            "citationCount": 42,
            "authors": [{"authorId": "auth1", "name": "John Doe"}, {"authorId": null, "name": null}],
            "externalIds": {"DOI": "10.1234/test", "CorpusId": 99},
            "url": "https://www.semanticscholar.org/paper/abc123"
        }"#;

        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.year, Some(2024));
        assert_eq!(paper.citations(), 42);
        assert_eq!(paper.doi(), Some("10.1234/test"));
        assert_eq!(paper.venue_name(), "Journal of Tests");
        assert_eq!(paper.author_names(), vec!["John Doe".to_string()]);
    }

    #[test]
    fn test_venue_falls_back_to_free_text() {
        let paper = Paper {
            venue: Some("Free Text Venue".into()),
            publication_venue: Some(PublicationVenue { id: None, name: Some(String::new()) }),
            ..Default::default()
        };
        assert_eq!(paper.venue_name(), "Free Text Venue");
    }

    #[test]
    fn test_negative_citations_clamped() {
        let paper = Paper { citation_count: Some(-3), ..Default::default() };
        assert_eq!(paper.citations(), 0);
    }

    #[test]
    fn test_author_papers_missing_list() {
        let result: AuthorPapers = serde_json::from_str(r#"{"authorId": "1"}"#).unwrap();
        assert!(result.papers.is_empty());
    }
}
