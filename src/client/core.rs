use crate::cache::ResponseCache;
use crate::client::stats::{AtomicStats, FetchStats};
use crate::transport::{Connector, Transport};
use crate::{Error, Result};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// GLEIF record endpoint; the identifier is appended verbatim.
pub const DEFAULT_BASE_URL: &str = "https://api.gleif.org/api/v1/lei-records?filter[lei]=";

struct Session {
    transport: Arc<dyn Transport>,
}

/// Client for the LEI lookup service.
///
/// One client owns one cache for its whole lifetime. The network session is
/// opened with [`LookupClient::open`] (or scoped with
/// [`LookupClient::session`]) and shared by every fetch running while it is
/// open.
pub struct LookupClient {
    pub(crate) cache: Arc<dyn ResponseCache>,
    pub(crate) connector: Arc<dyn Connector>,
    pub(crate) base_url: String,
    pub(crate) sleep_rate: Duration,
    pub(crate) retry_attempts: u32,
    pub(crate) retry_backoff: Duration,
    session: ArcSwapOption<Session>,
    stats: AtomicStats,
}

impl LookupClient {
    pub(crate) fn from_parts(
        cache: Arc<dyn ResponseCache>,
        connector: Arc<dyn Connector>,
        base_url: String,
        sleep_rate: Duration,
        retry_attempts: u32,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            cache,
            connector,
            base_url,
            sleep_rate,
            retry_attempts,
            retry_backoff,
            session: ArcSwapOption::empty(),
            stats: AtomicStats::default(),
        }
    }

    pub fn builder() -> crate::client::LookupClientBuilder {
        crate::client::LookupClientBuilder::new()
    }

    /// Open a fresh network session, replacing any session already open.
    pub fn open(&self) -> Result<()> {
        let transport = self.connector.connect()?;
        if self
            .session
            .swap(Some(Arc::new(Session { transport })))
            .is_some()
        {
            debug!("Replaced an already open lookup session");
        }
        Ok(())
    }

    /// Close the session. Returns `false` if none was open.
    ///
    /// Fetches already waiting on the network finish on the session they
    /// started with.
    pub fn close(&self) -> bool {
        self.session.swap(None).is_some()
    }

    pub fn is_open(&self) -> bool {
        self.session.load().is_some()
    }

    /// Open a session that is closed when the returned guard drops, including
    /// on early returns and `?` paths.
    pub fn session(&self) -> Result<SessionGuard<'_>> {
        self.open()?;
        Ok(SessionGuard { client: self })
    }

    pub fn cache(&self) -> &dyn ResponseCache {
        self.cache.as_ref()
    }

    pub fn stats(&self) -> FetchStats {
        self.stats.snapshot()
    }

    pub fn sleep_rate(&self) -> Duration {
        self.sleep_rate
    }

    pub fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    pub fn endpoint(&self, id: &str) -> String {
        format!("{}{}", self.base_url, id)
    }

    fn transport(&self) -> Result<Arc<dyn Transport>> {
        self.session
            .load_full()
            .map(|s| s.transport.clone())
            .ok_or(Error::SessionClosed)
    }

    /// Resolve one identifier to its raw payload.
    ///
    /// Cache hits return immediately without pacing; an empty cached body
    /// counts as a miss. On a miss the endpoint is queried up to
    /// `retry_attempts` times; only status 200 counts as success. Other
    /// statuses wait `retry_backoff` and retry. A transport failure ends the
    /// fetch at once. Both exhaustion and transport failure yield `Ok(None)`.
    pub async fn fetch(&self, id: &str) -> Result<Option<String>> {
        if let Some(data) = self.cache.get(id).filter(|d| !d.is_empty()) {
            AtomicStats::bump(&self.stats.cache_hits);
            info!("Fetching data for ID {} from cache.", id);
            return Ok(Some(data));
        }
        AtomicStats::bump(&self.stats.cache_misses);
        debug!("Cache miss for ID {}", id);

        let transport = self.transport()?;
        let url = self.endpoint(id);

        for attempt in 1..=self.retry_attempts {
            AtomicStats::bump(&self.stats.requests);
            match transport.get(&url).await {
                Ok(response) if response.is_ok() => {
                    self.cache.add(id, response.body.clone());
                    if !self.sleep_rate.is_zero() {
                        tokio::time::sleep(self.sleep_rate).await;
                    }
                    AtomicStats::bump(&self.stats.fetched);
                    info!("Fetched data for ID {} from the server.", id);
                    return Ok(Some(response.body));
                }
                Ok(response) => {
                    warn!(
                        "Response code {} received for ID {}. Retrying ({}/{})...",
                        response.status, id, attempt, self.retry_attempts
                    );
                    if !self.retry_backoff.is_zero() {
                        tokio::time::sleep(self.retry_backoff).await;
                    }
                }
                Err(e) => {
                    AtomicStats::bump(&self.stats.absent);
                    error!("An error occurred during fetch for ID {}: {}", id, e);
                    return Ok(None);
                }
            }
        }

        AtomicStats::bump(&self.stats.absent);
        error!(
            "Reached maximum retry attempts for ID {}. Unable to fetch data.",
            id
        );
        Ok(None)
    }
}

#[async_trait]
impl crate::client::Lookup for LookupClient {
    async fn fetch(&self, id: &str) -> Result<Option<String>> {
        LookupClient::fetch(self, id).await
    }
}

impl Drop for LookupClient {
    fn drop(&mut self) {
        if self.close() {
            debug!("Lookup session closed on client drop");
        }
    }
}

/// Scoped session; closes the client's session on drop.
pub struct SessionGuard<'a> {
    client: &'a LookupClient,
}

impl SessionGuard<'_> {
    pub fn client(&self) -> &LookupClient {
        self.client
    }
}

impl Deref for SessionGuard<'_> {
    type Target = LookupClient;

    fn deref(&self) -> &LookupClient {
        self.client
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.client.close();
    }
}
