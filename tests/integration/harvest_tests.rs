//! Integration tests for the harvester
//!
//! These tests use wiremock to stand up a fake tariff API and run the full
//! pipeline end-to-end: chapter list, traversal, aggregation and CSV output.

use serde_json::{json, Value};
use std::time::{Duration, Instant};
use taric_harvest::config::Config;
use taric_harvest::output::write_csv_file;
use taric_harvest::{HarvestError, Harvester};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, workers: usize) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_secs = 5;
    config.requests.interval_ms = 1;
    config.requests.max_attempts = 3;
    config.requests.backoff_base_ms = 10;
    config.workers.count = workers;
    config.progress.enabled = false;
    config
}

fn record(kind: &str, code: &str, description: &str, declarable: bool) -> Value {
    json!({
        "id": code,
        "type": kind,
        "attributes": {
            "goods_nomenclature_item_id": code,
            "description": description,
            "declarable": declarable
        }
    })
}

fn chapter_list(codes: &[&str]) -> Value {
    let data: Vec<Value> = codes
        .iter()
        .map(|code| record("chapter", code, "Chapter", false))
        .collect();
    json!({ "data": data })
}

fn document(data: Value, included: Vec<Value>) -> Value {
    json!({ "data": data, "included": included })
}

async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Chapter 01 -> heading 0101 -> commodity 0101210000 (Horses); chapter 02 has nothing declarable
async fn mount_two_chapter_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/chapters"))
        .and(header("accept", "application/vnd.uktt.v2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chapter_list(&["0100000000", "0200000000"])),
        )
        .mount(server)
        .await;

    mount_json(
        server,
        "/chapters/01",
        document(
            record("chapter", "0100000000", "Live animals", false),
            vec![
                json!({"id": "1", "type": "section", "attributes": {"title": "Section I"}}),
                record("heading", "0101", "Live horses, asses, mules and hinnies", false),
            ],
        ),
    )
    .await;

    mount_json(
        server,
        "/commodities/0101",
        document(
            record("heading", "0101", "Live horses, asses, mules and hinnies", false),
            vec![record("commodity", "0101210000", "Horses", true)],
        ),
    )
    .await;

    mount_json(
        server,
        "/commodities/0101210000",
        document(record("commodity", "0101210000", "Horses", true), vec![]),
    )
    .await;

    mount_json(
        server,
        "/chapters/02",
        document(
            record("chapter", "0200000000", "Meat and edible meat offal", false),
            vec![record("heading", "0201", "Meat of bovine animals", false)],
        ),
    )
    .await;

    mount_json(
        server,
        "/commodities/0201",
        document(record("heading", "0201", "Meat of bovine animals", false), vec![]),
    )
    .await;
}

#[tokio::test]
async fn test_end_to_end_two_chapters() {
    let mock_server = MockServer::start().await;
    mount_two_chapter_catalog(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), 2);
    let harvester = Harvester::from_config(&config).expect("Failed to build harvester");
    let report = harvester.run().await.expect("Harvest failed");

    assert_eq!(report.unique_count(), 1);
    assert_eq!(report.chapters_total, 2);
    assert_eq!(report.chapters_completed, 2);
    assert_eq!(report.failed_nodes, 0);

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("taric_codes_full.csv");
    write_csv_file(&output, &report.entries).expect("Failed to write CSV");

    let content = std::fs::read_to_string(&output).expect("Failed to read CSV");
    assert_eq!(content, "Code,Description\n0101210000,Horses\n");
}

#[tokio::test]
async fn test_single_worker_gives_same_result() {
    let mock_server = MockServer::start().await;
    mount_two_chapter_catalog(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), 1);
    let report = Harvester::from_config(&config)
        .unwrap()
        .run()
        .await
        .expect("Harvest failed");

    let codes: Vec<_> = report.entries.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["0101210000"]);
}

#[tokio::test]
async fn test_chapter_list_failure_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chapters"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2);
    let result = Harvester::from_config(&config).unwrap().run().await;

    assert!(matches!(result, Err(HarvestError::Bootstrap(_))));

    // Every attempt went to /chapters; no worker started
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.url.path() == "/chapters"));
}

#[tokio::test]
async fn test_malformed_chapter_list_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/chapters"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 2);
    let result = Harvester::from_config(&config).unwrap().run().await;

    match result {
        Err(HarvestError::Bootstrap(inner)) => {
            assert!(matches!(*inner, HarvestError::Decode { .. }));
        }
        other => panic!("expected bootstrap failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_subtrees_degrade_output() {
    let mock_server = MockServer::start().await;

    mount_json(&mock_server, "/chapters", chapter_list(&["0300000000"])).await;

    mount_json(
        &mock_server,
        "/chapters/03",
        document(
            record("chapter", "0300000000", "Fish", false),
            vec![
                record("heading", "0301", "Live fish", false),
                record("heading", "0302", "Fresh fish", false),
                record("commodity", "0303110000", "Frozen sockeye", true),
            ],
        ),
    )
    .await;

    // Exhausts retries
    Mock::given(method("GET"))
        .and(path("/commodities/0301"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    // Not JSON
    Mock::given(method("GET"))
        .and(path("/commodities/0302"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    mount_json(
        &mock_server,
        "/commodities/0303110000",
        document(
            record("commodity", "0303110000", "Frozen sockeye", true),
            vec![],
        ),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 2);
    let report = Harvester::from_config(&config).unwrap().run().await.unwrap();

    assert_eq!(report.failed_nodes, 2);
    assert!(report.is_partial());
    let codes: Vec<_> = report.entries.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["0303110000"]);
}

#[tokio::test]
async fn test_transient_throttling_recovers() {
    let mock_server = MockServer::start().await;

    mount_json(&mock_server, "/chapters", chapter_list(&["0100000000"])).await;

    Mock::given(method("GET"))
        .and(path("/chapters/01"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    mount_json(
        &mock_server,
        "/chapters/01",
        document(
            record("chapter", "0100000000", "Live animals", false),
            vec![record("commodity", "0101210000", "Horses", true)],
        ),
    )
    .await;

    mount_json(
        &mock_server,
        "/commodities/0101210000",
        document(record("commodity", "0101210000", "Horses", true), vec![]),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), 1);
    let report = Harvester::from_config(&config).unwrap().run().await.unwrap();

    assert_eq!(report.failed_nodes, 0);
    assert_eq!(report.unique_count(), 1);
}

#[tokio::test]
async fn test_rate_gate_bounds_aggregate_throughput() {
    let mock_server = MockServer::start().await;
    mount_two_chapter_catalog(&mock_server).await;

    let mut config = create_test_config(&mock_server.uri(), 2);
    config.requests.interval_ms = 40;

    let start = Instant::now();
    Harvester::from_config(&config).unwrap().run().await.unwrap();
    let elapsed = start.elapsed();

    // 6 requests through one gate: at least 5 full intervals between the first and last
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 6);
    assert!(
        elapsed >= Duration::from_millis(200),
        "6 requests finished in {:?}",
        elapsed
    );
}
