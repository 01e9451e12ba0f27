//! DOI resolution tests against a mocked Crossref API.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use publication_sync::client::{CrossrefClient, RateGate};
use publication_sync::config::Config;
use publication_sync::models::{CacheDocument, PublicationRecord};
use publication_sync::pipeline::resolve_cached;
use publication_sync::resolver::{IdentifierResolver, ResolutionReport};
use publication_sync::store::CacheStore;

const TITLE: &str = "Design and evaluation of a body-powered prosthetic wrist mechanism";

fn setup_resolver(config: Config) -> IdentifierResolver<CrossrefClient> {
    let client = CrossrefClient::new(&config).unwrap();
    IdentifierResolver::new(client, RateGate::new(config.lookup_interval))
}

fn test_config(mock_server: &MockServer) -> Config {
    Config::for_testing(&mock_server.uri())
}

fn works(doi: &str, title: &str) -> serde_json::Value {
    json!({
        "status": "ok",
        "message-type": "work-list",
        "message": {
            "total-results": 1,
            "items": [{"DOI": doi, "title": [title], "score": 42.0}]
        }
    })
}

fn record(id: &str, title: &str, doi: Option<&str>) -> PublicationRecord {
    PublicationRecord {
        id: id.to_string(),
        title: title.to_string(),
        year: 2019,
        venue: "Journal".to_string(),
        doi: doi.map(str::to_string),
        authors: vec!["P. Shrestha".to_string()],
        citations: 0,
        url: None,
    }
}

fn doc_of(records: Vec<PublicationRecord>) -> CacheDocument {
    CacheDocument::new(None, records)
}

// =============================================================================
// Acceptance
// =============================================================================

#[tokio::test]
async fn test_accepts_prefix_match_and_sends_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("query.title", TITLE))
        .and(query_param("query.author", "Shrestha"))
        .and(query_param("rows", "1"))
        .and(query_param("mailto", "someone@example.org"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(works("10.1016/j.wrist.2019.01", &format!("{TITLE}: a pilot study"))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server);
    config.author_hint = Some("Shrestha".to_string());
    config.crossref_mailto = Some("someone@example.org".to_string());
    let resolver = setup_resolver(config);

    let mut doc = doc_of(vec![record("p1", TITLE, None)]);
    let report = resolver.resolve(&mut doc).await;

    assert_eq!(report.resolved, 1);
    assert_eq!(doc.publications()[0].doi.as_deref(), Some("10.1016/j.wrist.2019.01"));
}

#[tokio::test]
async fn test_rejects_unrelated_candidate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(works("10.1/unrelated", "Completely unrelated work on polymers")),
        )
        .mount(&mock_server)
        .await;

    let resolver = setup_resolver(test_config(&mock_server));
    let mut doc = doc_of(vec![record("p1", "A study of battery degradation mechanisms", None)]);
    let report = resolver.resolve(&mut doc).await;

    assert_eq!(report.rejected, 1);
    assert_eq!(report.resolved, 0);
    assert_eq!(doc.publications()[0].doi, None);
}

// =============================================================================
// Lookup failures are per record
// =============================================================================

#[tokio::test]
async fn test_failures_do_not_abort_the_pass() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("query.title", "Server error title"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("query.title", "Malformed body title"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"message\": "))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("query.title", "Empty result title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": {"items": []}})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/works"))
        .and(query_param("query.title", TITLE))
        .respond_with(ResponseTemplate::new(200).set_body_json(works("10.1/ok", TITLE)))
        .mount(&mock_server)
        .await;

    let resolver = setup_resolver(test_config(&mock_server));
    let mut doc = doc_of(vec![
        record("a", "Server error title", None),
        record("b", "Malformed body title", None),
        record("c", "Empty result title", None),
        record("d", TITLE, None),
    ]);
    let report = resolver.resolve(&mut doc).await;

    assert_eq!(report.not_found, 3);
    assert_eq!(report.timed_out, 0);
    assert_eq!(report.resolved, 1);
    assert_eq!(doc.publications()[3].doi.as_deref(), Some("10.1/ok"));
}

#[tokio::test]
async fn test_timeout_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(works("10.1/slow", TITLE))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server);
    config.lookup_timeout = Duration::from_millis(200);
    let resolver = setup_resolver(config);

    let mut doc = doc_of(vec![record("p1", TITLE, None)]);
    let start = Instant::now();
    let report = resolver.resolve(&mut doc).await;

    assert_eq!(report.not_found, 1);
    assert_eq!(report.timed_out, 1);
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(doc.publications()[0].doi, None);
}

// =============================================================================
// Idempotence and rate limiting
// =============================================================================

#[tokio::test]
async fn test_existing_doi_is_never_looked_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(works("10.1/new", TITLE)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let resolver = setup_resolver(test_config(&mock_server));
    let mut doc = doc_of(vec![record("p1", TITLE, Some("10.1/first"))]);
    let report = resolver.resolve(&mut doc).await;

    assert_eq!(report.already_resolved, 1);
    assert_eq!(doc.publications()[0].doi.as_deref(), Some("10.1/first"));
}

#[tokio::test]
async fn test_lookups_are_spaced_by_interval() {
    let mock_server = MockServer::start().await;

    // Every candidate is rejected; spacing applies regardless.
    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(works("10.1/x", "Unrelated")))
        .expect(4)
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server);
    config.lookup_interval = Duration::from_millis(150);
    let resolver = setup_resolver(config);

    let mut doc = doc_of((0..4).map(|i| record(&format!("p{i}"), &format!("Paper number {i}"), None)).collect());
    let start = Instant::now();
    let report = resolver.resolve(&mut doc).await;

    assert_eq!(report.rejected, 4);
    // Four requests need at least three full intervals between them.
    assert!(start.elapsed() >= Duration::from_millis(440), "elapsed {:?}", start.elapsed());
    assert_eq!(resolver.gate().admitted(), 4);
}

// =============================================================================
// Load, resolve, save
// =============================================================================

#[tokio::test]
async fn test_resolve_cached_rewrites_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(works("10.1/resolved", TITLE)))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::new(dir.path().join("cache.json"));
    let mut low = record("low", TITLE, None);
    low.citations = 1;
    let mut high = record("high", "Already resolved work", Some("10.1/kept"));
    high.citations = 9;
    // Stored out of canonical order on purpose.
    store.save(&doc_of(vec![low, high])).unwrap();

    let resolver = setup_resolver(test_config(&mock_server));
    let report = resolve_cached(&store, &resolver).await.unwrap().unwrap();

    assert_eq!(
        report,
        ResolutionReport {
            total: 2,
            already_resolved: 1,
            resolved: 1,
            not_found: 0,
            timed_out: 0,
            rejected: 0,
            skipped: 0
        }
    );
    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.count(), 2);
    let ids: Vec<_> = stored.publications().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["high", "low"]);
    assert_eq!(stored.publications()[1].doi.as_deref(), Some("10.1/resolved"));

    // A second pass changes nothing.
    let again = resolve_cached(&store, &resolver).await.unwrap().unwrap();
    assert_eq!(again.already_resolved, 2);
    assert_eq!(store.load().unwrap().unwrap(), stored);
}

#[tokio::test]
async fn test_resolve_cached_without_document_writes_nothing() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::new(dir.path().join("cache.json"));

    let resolver = setup_resolver(test_config(&mock_server));
    assert!(resolve_cached(&store, &resolver).await.unwrap().is_none());
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_resolve_cached_skips_curated_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/works"))
        .respond_with(ResponseTemplate::new(200).set_body_json(works("10.1/wrong", "Wrist mechanism")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CacheStore::new(dir.path().join("cache.json"));
    store.save(&doc_of(vec![record("patent-1", "Wrist mechanism", None)])).unwrap();

    let resolver = setup_resolver(test_config(&mock_server))
        .with_skip_ids(["patent-1".to_string()]);
    let report = resolve_cached(&store, &resolver).await.unwrap().unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(store.load().unwrap().unwrap().publications()[0].doi, None);
}
