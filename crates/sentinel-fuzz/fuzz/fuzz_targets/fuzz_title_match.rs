#![no_main]

use libfuzzer_sys::fuzz_target;
use publication_sync::resolver::{MatchThresholds, match_titles};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let (query, candidate) = text.split_once('\n').unwrap_or((text.as_ref(), ""));
    let _ = match_titles(query, candidate, MatchThresholds::default());
    // A title always matches itself
    assert!(match_titles(query, query, MatchThresholds::default()).is_accepted());
});
