//! Full pipeline: CSV in, enriched CSV out.

use crate::mock_server::{record, MockServerFixture, E1, E2};
use lei_enricher::runner::{RunOutcome, Runner};
use lei_enricher::source::CsvSource;
use lei_enricher::EnricherConfig;
use serde_json::json;
use std::path::Path;

fn config(fixture: &MockServerFixture, dir: &Path) -> EnricherConfig {
    EnricherConfig {
        base_url: fixture.base_url(),
        sleep_rate: 0.0,
        retry_attempts: 1,
        retry_backoff_ms: 0,
        input_file: dir.join("input.csv"),
        output_file: dir.join("out").join("output.csv"),
        ..EnricherConfig::default()
    }
}

#[tokio::test]
async fn test_run_writes_enriched_output() {
    let mut fixture = MockServerFixture::new().await;
    let _gb = fixture
        .mock_record(E1, &record("Company 1", "1234", "GB"), 1)
        .await;
    let _nl = fixture
        .mock_record(E2, &record("Company 2", "5678", "NL"), 1)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = config(&fixture, dir.path());
    std::fs::write(
        &config.input_file,
        format!("lei,notional,rate\n{},1000,1.5\n{},2000,2.0\n", E1, E2),
    )
    .unwrap();

    let runner = Runner::new(config.clone()).unwrap();
    let outcome = runner.run().await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Completed {
            rows: 2,
            output: config.output_file.clone()
        }
    );
    assert!(!runner.client().is_open());

    let out = CsvSource::new().load(&config.output_file).unwrap();
    assert_eq!(out.get(0, "legal_name"), Some(&json!("Company 1")));
    assert_eq!(out.get(1, "country"), Some(&json!("NL")));
    let costs: Vec<f64> = out
        .column("transaction_costs")
        .unwrap()
        .iter()
        .filter_map(|c| c.as_f64())
        .collect();
    assert_eq!(costs, vec![500.0, 1000.0]);
}

#[tokio::test]
async fn test_invalid_input_stops_before_lookup() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_record(E1, "{}", 0).await;

    let dir = tempfile::tempdir().unwrap();
    let config = config(&fixture, dir.path());
    std::fs::write(&config.input_file, format!("lei,notional\n{},1000\n", E1)).unwrap();

    let outcome = Runner::new(config.clone()).unwrap().run().await.unwrap();

    assert_eq!(outcome, RunOutcome::InvalidInput);
    assert!(!config.output_file.exists());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unenriched_rows_fail_output_validation() {
    let mut fixture = MockServerFixture::new().await;
    let _gb = fixture
        .mock_record(E1, &record("Company 1", "1234", "GB"), 1)
        .await;
    let _missing = fixture.mock_status(E2, 404, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let config = config(&fixture, dir.path());
    std::fs::write(
        &config.input_file,
        format!("lei,notional,rate\n{},1000,1.5\n{},2000,2.0\n", E1, E2),
    )
    .unwrap();

    let outcome = Runner::new(config.clone()).unwrap().run().await.unwrap();

    assert_eq!(outcome, RunOutcome::InvalidOutput);
    assert!(!config.output_file.exists());
}

#[tokio::test]
async fn test_unknown_client_is_rejected() {
    let fixture = MockServerFixture::new().await;
    let dir = tempfile::tempdir().unwrap();
    let config = EnricherConfig {
        client: "OtherClient".into(),
        ..config(&fixture, dir.path())
    };
    assert!(matches!(
        Runner::new(config),
        Err(lei_enricher::Error::Configuration { .. })
    ));
}
