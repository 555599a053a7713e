use std::sync::atomic::{AtomicU64, Ordering};

/// Counters accumulated over the lifetime of a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Individual HTTP attempts, retries included.
    pub requests: u64,
    pub fetched: u64,
    /// Misses that ended without a payload.
    pub absent: u64,
}

impl FetchStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct AtomicStats {
    pub cache_hits: AtomicU64,
    pub cache_misses: AtomicU64,
    pub requests: AtomicU64,
    pub fetched: AtomicU64,
    pub absent: AtomicU64,
}

impl AtomicStats {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FetchStats {
        FetchStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            fetched: self.fetched.load(Ordering::Relaxed),
            absent: self.absent.load(Ordering::Relaxed),
        }
    }
}
