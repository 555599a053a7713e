//! Mock HTTP server setup for integration tests

use lei_enricher::{LookupClient, LookupClientBuilder};
use mockito::{Mock, Server, ServerGuard};
use std::time::Duration;

pub const E1: &str = "XKZZ2JZF41MRHTR1V493";
pub const E2: &str = "213800MBWEIJDM5CU638";

/// GLEIF-shaped record for one entity.
pub fn record(name: &str, bic: &str, country: &str) -> String {
    serde_json::json!({
        "data": [{
            "attributes": {
                "entity": {
                    "legalName": { "name": name },
                    "legalAddress": { "country": country }
                },
                "bic": [bic]
            }
        }]
    })
    .to_string()
}

/// Test fixture that owns a mock server. Identifiers are served under
/// `/lei/<id>`.
pub struct MockServerFixture {
    pub server: ServerGuard,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}/lei/", self.server.url())
    }

    /// Builder pointed at the mock server with pauses disabled.
    pub fn builder(&self) -> LookupClientBuilder {
        LookupClient::builder()
            .base_url(self.base_url())
            .sleep_rate(Duration::ZERO)
            .retry_backoff(Duration::ZERO)
    }

    pub async fn mock_record(&mut self, id: &str, body: &str, hits: usize) -> Mock {
        self.server
            .mock("GET", format!("/lei/{}", id).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    pub async fn mock_status(&mut self, id: &str, status: usize, hits: usize) -> Mock {
        self.server
            .mock("GET", format!("/lei/{}", id).as_str())
            .with_status(status)
            .expect(hits)
            .create_async()
            .await
    }
}
