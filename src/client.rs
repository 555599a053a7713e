//! Lookup client: resolves identifiers to raw payloads through the cache, the
//! network session, a pacing delay and bounded retries.
//!
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod stats;

pub use builder::LookupClientBuilder;
pub use self::core::{LookupClient, SessionGuard, DEFAULT_BASE_URL};
pub use stats::FetchStats;

use crate::Result;
use async_trait::async_trait;

/// Anything that can turn one identifier into a raw payload.
///
/// `Ok(None)` is the normal "no data" outcome; `Err` is reserved for misuse
/// such as fetching without an open session.
#[async_trait]
pub trait Lookup: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Option<String>>;
}
