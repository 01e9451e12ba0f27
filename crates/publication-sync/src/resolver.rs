//! DOI resolution by title search.
//!
//! Title search is ambiguous, so a candidate is only accepted when its title
//! shares a long leading prefix with the record's title, or when most of the
//! record title's leading words appear in it.

use std::collections::HashSet;

use crate::client::{CrossrefClient, RateGate};
use crate::config::matching;
use crate::error::LookupError;
use crate::models::{CacheDocument, DoiCandidate};

/// Title search against a secondary bibliographic source.
#[async_trait::async_trait]
pub trait DoiLookup: Send + Sync {
    /// Best-ranked candidate for `title`.
    async fn lookup(&self, title: &str) -> Result<DoiCandidate, LookupError>;
}

#[async_trait::async_trait]
impl DoiLookup for CrossrefClient {
    async fn lookup(&self, title: &str) -> Result<DoiCandidate, LookupError> {
        self.search_title(title).await?.ok_or(LookupError::NoCandidate)
    }
}

/// Acceptance thresholds for a title match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchThresholds {
    /// Leading characters that must be identical for a prefix match.
    pub prefix_chars: usize,
    /// Leading query tokens considered for the overlap match.
    pub window_tokens: usize,
    /// Window tokens that must occur in the candidate title.
    pub min_token_hits: usize,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            prefix_chars: matching::PREFIX_CHARS,
            window_tokens: matching::WINDOW_TOKENS,
            min_token_hits: matching::MIN_TOKEN_HITS,
        }
    }
}

/// Result of comparing a record title with a candidate title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Leading characters are identical.
    Prefix,
    /// Enough leading tokens occur in the candidate.
    TokenOverlap {
        /// Window tokens found in the candidate.
        hits: usize,
    },
    /// Neither rule accepted the candidate.
    Rejected {
        /// Window tokens found in the candidate.
        hits: usize,
    },
}

impl MatchOutcome {
    /// Whether the candidate should be attached.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

/// Compare titles case-insensitively; the prefix rule is tried first.
#[must_use]
pub fn match_titles(query: &str, candidate: &str, thresholds: MatchThresholds) -> MatchOutcome {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    if query
        .chars()
        .take(thresholds.prefix_chars)
        .eq(candidate.chars().take(thresholds.prefix_chars))
    {
        return MatchOutcome::Prefix;
    }

    let hits = query
        .split_whitespace()
        .take(thresholds.window_tokens)
        .filter(|token| candidate.contains(token))
        .count();

    if hits >= thresholds.min_token_hits {
        MatchOutcome::TokenOverlap { hits }
    } else {
        MatchOutcome::Rejected { hits }
    }
}

/// Counts from one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Records in the document.
    pub total: usize,
    /// Records that already had a DOI.
    pub already_resolved: usize,
    /// Records that gained a DOI in this pass.
    pub resolved: usize,
    /// Lookups that failed or returned nothing.
    pub not_found: usize,
    /// Lookups among `not_found` that hit the request timeout.
    pub timed_out: usize,
    /// Candidates the title heuristic refused.
    pub rejected: usize,
    /// Records excluded from lookup.
    pub skipped: usize,
}

impl ResolutionReport {
    /// Records carrying a DOI after the pass.
    #[must_use]
    pub const fn with_doi(&self) -> usize {
        self.already_resolved + self.resolved
    }

    /// Lookups issued during the pass.
    #[must_use]
    pub const fn lookups(&self) -> usize {
        self.resolved + self.not_found + self.rejected
    }
}

/// Fills in missing DOIs, one rate-limited lookup at a time.
#[derive(Debug)]
pub struct IdentifierResolver<L> {
    lookup: L,
    gate: RateGate,
    thresholds: MatchThresholds,
    skip_ids: HashSet<String>,
}

impl<L: DoiLookup> IdentifierResolver<L> {
    #[must_use]
    pub fn new(lookup: L, gate: RateGate) -> Self {
        Self { lookup, gate, thresholds: MatchThresholds::default(), skip_ids: HashSet::new() }
    }

    /// Override the acceptance thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: MatchThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Never look up records with these ids.
    #[must_use]
    pub fn with_skip_ids(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.skip_ids.extend(ids);
        self
    }

    /// Rate gate shared by every lookup of this resolver.
    #[must_use]
    pub const fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// Resolve every record without a DOI, strictly in order.
    ///
    /// Existing DOIs are never replaced, so running the pass again is safe.
    /// Lookup failures only affect their own record.
    pub async fn resolve(&self, doc: &mut CacheDocument) -> ResolutionReport {
        let total = doc.count();
        let mut report = ResolutionReport { total, ..ResolutionReport::default() };

        for (index, record) in doc.publications_mut().iter_mut().enumerate() {
            if record.has_doi() {
                report.already_resolved += 1;
                continue;
            }
            if self.skip_ids.contains(&record.id) {
                report.skipped += 1;
                continue;
            }

            tracing::info!(
                position = index + 1,
                total,
                title = %truncate(&record.title, 70),
                "Looking up DOI"
            );

            let permit = self.gate.acquire().await;
            let result = self.lookup.lookup(&record.title).await;
            drop(permit);

            let candidate = match result {
                Ok(candidate) => candidate,
                Err(e) if e.is_timeout() => {
                    tracing::warn!(id = %record.id, error = %e, "DOI lookup timed out");
                    report.not_found += 1;
                    report.timed_out += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!(id = %record.id, error = %e, "DOI not found");
                    report.not_found += 1;
                    continue;
                }
            };

            let outcome = match_titles(&record.title, &candidate.title, self.thresholds);
            if outcome.is_accepted() {
                tracing::info!(id = %record.id, doi = %candidate.doi, ?outcome, "DOI resolved");
                record.doi = Some(candidate.doi);
                report.resolved += 1;
            } else {
                tracing::info!(
                    id = %record.id,
                    candidate = %truncate(&candidate.title.to_lowercase(), 60),
                    ?outcome,
                    "Skipping mismatched candidate"
                );
                report.rejected += 1;
            }
        }

        tracing::info!(
            with_doi = report.with_doi(),
            lookups = report.lookups(),
            resolved = report.resolved,
            not_found = report.not_found,
            rejected = report.rejected,
            total = report.total,
            "Resolution pass complete"
        );
        report
    }
}

/// First `max` characters of `s`.
fn truncate(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(i, _)| &s[..i])
}
