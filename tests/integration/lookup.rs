//! Lookup client against a live (mock) HTTP endpoint.

use crate::mock_server::{record, MockServerFixture, E1, E2};
use lei_enricher::Error;

#[tokio::test]
async fn test_success_is_cached_and_served_without_network() {
    let mut fixture = MockServerFixture::new().await;
    let body = record("Company 1", "1234", "GB");
    let mock = fixture.mock_record(E1, &body, 1).await;

    let client = fixture.builder().build().unwrap();
    let _session = client.session().unwrap();

    assert_eq!(client.fetch(E1).await.unwrap(), Some(body.clone()));
    assert_eq!(client.fetch(E1).await.unwrap(), Some(body.clone()));

    mock.assert_async().await;
    assert_eq!(client.cache().get(E1), Some(body));
    let stats = client.stats();
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.requests, 1);
}

#[tokio::test]
async fn test_non_200_retries_then_gives_up() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_status(E2, 404, 3).await;

    let client = fixture.builder().retry_attempts(3).build().unwrap();
    let _session = client.session().unwrap();

    assert_eq!(client.fetch(E2).await.unwrap(), None);
    mock.assert_async().await;
    assert!(client.cache().is_empty());
    assert_eq!(client.stats().absent, 1);
}

#[tokio::test]
async fn test_failed_lookup_is_not_cached() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_status(E2, 503, 4).await;

    let client = fixture.builder().retry_attempts(2).build().unwrap();
    let _session = client.session().unwrap();

    assert_eq!(client.fetch(E2).await.unwrap(), None);
    assert_eq!(client.fetch(E2).await.unwrap(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_without_session_makes_no_request() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_record(E1, "{}", 0).await;

    let client = fixture.builder().build().unwrap();
    let err = client.fetch(E1).await.unwrap_err();

    assert!(matches!(err, Error::SessionClosed));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_cache_survives_session_close() {
    let mut fixture = MockServerFixture::new().await;
    let body = record("Company 1", "1234", "GB");
    let mock = fixture.mock_record(E1, &body, 1).await;

    let client = fixture.builder().build().unwrap();
    {
        let _session = client.session().unwrap();
        client.fetch(E1).await.unwrap();
    }
    assert!(!client.is_open());

    assert_eq!(client.fetch(E1).await.unwrap(), Some(body));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_evicted_entry_is_fetched_again() {
    let mut fixture = MockServerFixture::new().await;
    let a = fixture.mock_record(E1, &record("A", "1", "GB"), 2).await;
    let b = fixture.mock_record(E2, &record("B", "2", "NL"), 1).await;

    let client = fixture.builder().cache_size(1).build().unwrap();
    let _session = client.session().unwrap();

    client.fetch(E1).await.unwrap();
    client.fetch(E2).await.unwrap();
    client.fetch(E1).await.unwrap();

    a.assert_async().await;
    b.assert_async().await;
    assert_eq!(client.cache().len(), 1);
}
