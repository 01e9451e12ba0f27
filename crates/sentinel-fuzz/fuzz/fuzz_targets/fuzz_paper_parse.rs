#![no_main]

use libfuzzer_sys::fuzz_target;
use publication_sync::fetcher::normalize;
use publication_sync::models::AuthorPapers;

fuzz_target!(|data: &[u8]| {
    // Arbitrary Graph API bodies must parse or fail, never panic
    if let Ok(author) = serde_json::from_slice::<AuthorPapers>(data) {
        let total = author.papers.len();
        assert!(normalize(author.papers).len() <= total);
    }
});
