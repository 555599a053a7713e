//! Bounded response cache: keeps raw lookup payloads so repeated identifiers
//! skip the network.
//!
//! # Response Cache Module
//!
//! The lookup client consults the cache before every network request and
//! populates it after every successful fetch. Entries never expire; the store is
//! bounded by capacity alone and evicts the entry that was inserted longest ago.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`ResponseCache`] | Trait for cache stores injected into the client |
//! | [`FifoCache`] | Fixed-capacity store with insertion-order eviction |
//! | [`NullCache`] | No-op store for disabling caching |
//!
//! ## Example
//!
//! ```rust
//! use lei_enricher::cache::{FifoCache, ResponseCache};
//!
//! let cache = FifoCache::new(2).unwrap();
//! cache.add("k1", "v1".to_string());
//! cache.add("k2", "v2".to_string());
//! cache.add("k3", "v3".to_string());
//!
//! assert_eq!(cache.get("k1"), None);
//! assert_eq!(cache.get("k3").as_deref(), Some("v3"));
//! ```
//!
//! ## Eviction
//!
//! Eviction follows insertion order, not access order. Overwriting a key that
//! is already present keeps its original position, so it neither evicts
//! anything nor delays its own eviction.

mod backend;

pub use backend::{FifoCache, NullCache, ResponseCache, DEFAULT_CACHE_CAPACITY};
