//! Fuzzing library for publication-sync.
//!
//! Targets cover the cache document and Graph API payload parsers, plus the
//! title matcher used during DOI resolution.
//!
//! # Usage
//!
//! ```bash
//! cd crates/sentinel-fuzz
//! cargo +nightly fuzz run fuzz_cache_parse -- -max_total_time=60
//! ```

pub use publication_sync::{models, resolver};
