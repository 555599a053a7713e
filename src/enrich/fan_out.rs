use crate::client::Lookup;
use crate::Result;
use futures::future::try_join_all;
use futures::{stream, StreamExt, TryStreamExt};

/// Dispatch strategy for a batch of fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOut {
    /// Every identifier is dispatched at once.
    #[default]
    Unbounded,
    /// At most `max_concurrency` fetches in flight.
    Bounded { max_concurrency: usize },
}

/// Fetch every identifier concurrently; `result[i]` belongs to `ids[i]`.
///
/// Expected lookup failures are `None` entries. An `Err` (e.g. the session was
/// never opened) aborts the batch.
pub async fn fetch_all<L>(lookup: &L, ids: &[String], fan_out: FanOut) -> Result<Vec<Option<String>>>
where
    L: Lookup + ?Sized,
{
    match fan_out {
        FanOut::Unbounded => try_join_all(ids.iter().map(|id| lookup.fetch(id))).await,
        FanOut::Bounded { max_concurrency } => {
            stream::iter(ids.iter())
                .map(|id| lookup.fetch(id))
                .buffered(max_concurrency.max(1))
                .try_collect()
                .await
        }
    }
}
