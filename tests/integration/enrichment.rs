//! Enrichment through the real client and parser.

use crate::mock_server::{record, MockServerFixture, E1, E2};
use lei_enricher::{Enricher, FanOut, LeiParser, Lookup, Table};
use serde_json::{json, Value};
use std::sync::Arc;

fn trades(ids: &[&str]) -> Table {
    Table::from_rows(
        vec!["lei".into(), "notional".into(), "rate".into()],
        ids.iter()
            .map(|id| vec![json!(id), json!(1000), json!(1.5)])
            .collect(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_found_and_missing_identifiers() {
    let mut fixture = MockServerFixture::new().await;
    let found = fixture
        .mock_record(E1, &record("Company 1", "1234", "GB"), 1)
        .await;
    let missing = fixture.mock_status(E2, 404, 2).await;

    let client = Arc::new(fixture.builder().retry_attempts(2).build().unwrap());
    let _session = client.session().unwrap();
    let lookup: Arc<dyn Lookup> = client.clone();

    let out = Enricher::new(lookup, Arc::new(LeiParser::new()))
        .enrich_column(trades(&[E1, E2]), "lei")
        .await
        .unwrap();

    found.assert_async().await;
    missing.assert_async().await;
    assert_eq!(
        out.columns(),
        ["lei", "notional", "rate", "legal_name", "bic", "country"]
    );
    assert_eq!(out.get(0, "legal_name"), Some(&json!("Company 1")));
    assert_eq!(out.get(0, "bic"), Some(&json!("1234")));
    assert_eq!(out.get(0, "country"), Some(&json!("GB")));
    assert_eq!(out.get(1, "legal_name"), Some(&Value::Null));
    assert_eq!(out.get(1, "country"), Some(&Value::Null));
}

#[tokio::test]
async fn test_concurrent_duplicates_share_payload_and_failure_stays_absent() {
    let mut fixture = MockServerFixture::new().await;
    // Both copies of E1 may miss the cache and reach the network.
    let a = fixture
        .server
        .mock("GET", format!("/lei/{}", E1).as_str())
        .with_status(200)
        .with_body(record("A", "1", "GB"))
        .expect_at_least(1)
        .create_async()
        .await;
    let b = fixture.mock_status(E2, 500, 3).await;

    let client = Arc::new(fixture.builder().retry_attempts(3).build().unwrap());
    let _session = client.session().unwrap();
    let lookup: Arc<dyn Lookup> = client.clone();

    let enricher = Enricher::new(lookup, Arc::new(LeiParser::new()));
    assert_eq!(enricher.fan_out(), FanOut::Unbounded);
    let out = enricher
        .enrich_column(trades(&[E1, E2, E1]), "lei")
        .await
        .unwrap();

    a.assert_async().await;
    b.assert_async().await;
    assert_eq!(out.len(), 3);
    assert_eq!(out.rows()[0], out.rows()[2]);
    assert_eq!(out.get(0, "legal_name"), Some(&json!("A")));
    for column in ["legal_name", "bic", "country"] {
        assert_eq!(out.get(1, column), Some(&Value::Null));
    }
    assert_eq!(client.stats().absent, 1);
}

#[tokio::test]
async fn test_sequential_duplicates_hit_the_cache() {
    let mut fixture = MockServerFixture::new().await;
    let a = fixture.mock_record(E1, &record("A", "1", "GB"), 1).await;
    let b = fixture.mock_record(E2, &record("B", "2", "NL"), 1).await;

    let client = Arc::new(fixture.builder().build().unwrap());
    let _session = client.session().unwrap();
    let lookup: Arc<dyn Lookup> = client.clone();

    let out = Enricher::new(lookup, Arc::new(LeiParser::new()))
        .with_fan_out(FanOut::Bounded { max_concurrency: 1 })
        .enrich_column(trades(&[E1, E2, E1]), "lei")
        .await
        .unwrap();

    a.assert_async().await;
    b.assert_async().await;
    assert_eq!(out.get(0, "legal_name"), Some(&json!("A")));
    assert_eq!(out.get(1, "legal_name"), Some(&json!("B")));
    assert_eq!(out.get(2, "legal_name"), Some(&json!("A")));
    assert_eq!(client.stats().cache_hits, 1);
}

#[tokio::test]
async fn test_unbounded_fan_out_keeps_order() {
    let mut fixture = MockServerFixture::new().await;
    let ids: Vec<String> = (0..8).map(|i| format!("LEI{:017}", i)).collect();
    let mut mocks = Vec::new();
    for (i, id) in ids.iter().enumerate() {
        let body = record(&format!("Entity {}", i), "0", "GB");
        mocks.push(fixture.mock_record(id, &body, 1).await);
    }

    let client = Arc::new(fixture.builder().build().unwrap());
    let _session = client.session().unwrap();
    let lookup: Arc<dyn Lookup> = client.clone();

    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let out = Enricher::new(lookup, Arc::new(LeiParser::new()))
        .enrich_column(trades(&refs), "lei")
        .await
        .unwrap();

    for mock in &mocks {
        mock.assert_async().await;
    }
    for i in 0..ids.len() {
        assert_eq!(out.get(i, "legal_name"), Some(&json!(format!("Entity {}", i))));
    }
}
