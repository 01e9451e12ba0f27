#![no_main]

use libfuzzer_sys::fuzz_target;
use publication_sync::models::CacheDocument;

fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = serde_json::from_slice::<CacheDocument>(data) {
        // Anything that parsed must serialize again
        let _ = serde_json::to_vec(&doc).unwrap();
    }
});
