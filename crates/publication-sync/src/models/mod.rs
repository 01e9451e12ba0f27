//! Data models for the upstream APIs and the persisted dataset.
//!
//! Upstream models use `#[serde(default)]` for optional fields and
//! `#[serde(rename = "camelCase")]` to match API naming.

mod crossref;
mod paper;
mod publication;

pub use crossref::{DoiCandidate, Work, WorksMessage, WorksResponse};
pub use paper::{AuthorPapers, AuthorRef, ExternalIds, Paper, PublicationVenue};
pub use publication::{CacheDocument, PublicationRecord, canonical_order, sort_canonical};
