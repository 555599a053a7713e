//! Cache store implementations.

use crate::{Error, ErrorContext, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Capacity used when the caller does not configure one.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Key/value store for raw lookup payloads.
///
/// Lookups never fail: a missing key is `None`. Implementations must be safe
/// to share between concurrently running fetches.
pub trait ResponseCache: Send + Sync {
    fn add(&self, key: &str, value: String);
    fn get(&self, key: &str) -> Option<String>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn name(&self) -> &'static str;
}

#[derive(Debug, Default)]
struct State {
    entries: HashMap<String, String>,
    // Keys in insertion order, oldest first. Holds exactly the keys of `entries`.
    order: VecDeque<String>,
}

/// Fixed-capacity cache evicting the oldest inserted entry.
#[derive(Debug)]
pub struct FifoCache {
    state: RwLock<State>,
    capacity: usize,
}

impl FifoCache {
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::configuration_with_context(
                "cache capacity must be at least 1",
                ErrorContext::new()
                    .with_field_path("cache_size")
                    .with_details("got 0")
                    .with_source("fifo_cache"),
            ));
        }
        Ok(Self {
            state: RwLock::new(State {
                entries: HashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
            }),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().entries.contains_key(key)
    }

    /// Keys from oldest to newest insertion.
    pub fn keys(&self) -> Vec<String> {
        self.read().order.iter().cloned().collect()
    }

    // A panic while holding the lock cannot leave `State` half-updated in a way
    // that breaks the size bound, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for FifoCache {
    fn default() -> Self {
        Self {
            state: RwLock::new(State::default()),
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ResponseCache for FifoCache {
    fn add(&self, key: &str, value: String) {
        let mut state = self.write();
        if let Some(existing) = state.entries.get_mut(key) {
            *existing = value;
            return;
        }
        if state.entries.len() >= self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
            }
        }
        state.order.push_back(key.to_string());
        state.entries.insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.read().entries.get(key).cloned()
    }

    fn len(&self) -> usize {
        self.read().entries.len()
    }

    fn name(&self) -> &'static str {
        "fifo"
    }
}

/// Cache that stores nothing; every lookup misses.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache for NullCache {
    fn add(&self, _: &str, _: String) {}
    fn get(&self, _: &str) -> Option<String> {
        None
    }
    fn len(&self) -> usize {
        0
    }
    fn name(&self) -> &'static str {
        "null"
    }
}
