use crate::cache::{FifoCache, ResponseCache, DEFAULT_CACHE_CAPACITY};
use crate::client::core::{LookupClient, DEFAULT_BASE_URL};
use crate::config::EnricherConfig;
use crate::transport::{Connector, HttpConfig, HttpConnector};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`LookupClient`].
///
/// Defaults: a 100-entry FIFO cache, 0.6 s pause after each live fetch,
/// 3 attempts with a fixed 1 s backoff, and the GLEIF endpoint over a
/// reqwest session.
pub struct LookupClientBuilder {
    cache: Option<Arc<dyn ResponseCache>>,
    cache_size: usize,
    sleep_rate: Duration,
    retry_attempts: u32,
    retry_backoff: Duration,
    base_url: String,
    connector: Option<Arc<dyn Connector>>,
    http: HttpConfig,
}

impl LookupClientBuilder {
    pub fn new() -> Self {
        Self {
            cache: None,
            cache_size: DEFAULT_CACHE_CAPACITY,
            sleep_rate: Duration::from_millis(600),
            retry_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            base_url: DEFAULT_BASE_URL.to_string(),
            connector: None,
            http: HttpConfig::default(),
        }
    }

    /// Start from a loaded configuration.
    pub fn from_config(config: &EnricherConfig) -> Result<Self> {
        Ok(Self::new()
            .cache_size(config.cache_size)
            .sleep_rate(config.sleep_rate_duration()?)
            .retry_attempts(config.retry_attempts)
            .retry_backoff(Duration::from_millis(config.retry_backoff_ms))
            .base_url(config.base_url.clone())
            .http_config(
                HttpConfig::new()
                    .with_timeout(Duration::from_secs(config.timeout_secs))
                    .with_accept_invalid_certs(config.accept_invalid_certs),
            ))
    }

    /// Capacity of the default FIFO cache. Ignored when [`Self::cache`] is set.
    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    /// Inject a cache store.
    pub fn cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Pause applied after every successful network fetch.
    pub fn sleep_rate(mut self, pause: Duration) -> Self {
        self.sleep_rate = pause;
        self
    }

    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Fixed wait after each non-200 response.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the HTTP session factory (mainly for tests).
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Settings for the default reqwest connector.
    pub fn http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    pub fn build(self) -> Result<LookupClient> {
        if self.retry_attempts == 0 {
            return Err(Error::configuration_with_context(
                "retry attempts must be at least 1",
                ErrorContext::new()
                    .with_field_path("retry_attempts")
                    .with_source("lookup_client_builder"),
            ));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                "base URL is not a valid absolute URL",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(format!("{}: {}", self.base_url, e))
                    .with_source("lookup_client_builder"),
            )
        })?;

        let cache = match self.cache {
            Some(cache) => cache,
            None => Arc::new(FifoCache::new(self.cache_size)?),
        };
        let connector = self
            .connector
            .unwrap_or_else(|| Arc::new(HttpConnector::new(self.http)));

        Ok(LookupClient::from_parts(
            cache,
            connector,
            self.base_url,
            self.sleep_rate,
            self.retry_attempts,
            self.retry_backoff,
        ))
    }
}

impl Default for LookupClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
