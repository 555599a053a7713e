//! # lei-enricher
//!
//! Enriches tabular trade data with legal entity information looked up by
//! LEI (Legal Entity Identifier), then derives transaction costs per row.
//!
//! ## Overview
//!
//! The core is a lookup client that combines a bounded FIFO response cache,
//! fixed-backoff retries and a post-request pause behind a session
//! lifecycle. An [`Enricher`] fans a column of identifiers out over that
//! client, keeps results in input order, parses each payload into fields and
//! merges them back onto the originating rows.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lei_enricher::{Enricher, LeiParser, Lookup, LookupClient, Table};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> lei_enricher::Result<()> {
//!     let client = Arc::new(LookupClient::builder().cache_size(100).build()?);
//!     let table = Table::new(vec!["lei".into()]);
//!
//!     let session = client.session()?;
//!     let lookup: Arc<dyn Lookup> = client.clone();
//!     let enriched = Enricher::new(lookup, Arc::new(LeiParser::new()))
//!         .enrich_column(table, "lei")
//!         .await?;
//!     drop(session);
//!
//!     println!("{} rows", enriched.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Bounded FIFO response cache |
//! | [`client`] | Fetch-cache-retry lookup client and session lifecycle |
//! | [`transport`] | HTTP transport and connector seam |
//! | [`enrich`] | Concurrent fan-out and positional merge |
//! | [`parser`] | Payload to field extraction |
//! | [`table`] | Minimal row-indexed table |
//! | [`source`] | CSV load/save |
//! | [`validate`] | Input/output structure checks |
//! | [`calc`] | Per-row derived fields |
//! | [`runner`] | End-to-end pipeline |
//! | [`config`] | Layered configuration |
//! | [`telemetry`] | Tracing setup |

pub mod cache;
pub mod calc;
pub mod client;
pub mod config;
pub mod enrich;
pub mod parser;
pub mod runner;
pub mod source;
pub mod table;
pub mod telemetry;
pub mod transport;
pub mod utils;
pub mod validate;

// Re-export main types for convenience
pub use cache::{FifoCache, ResponseCache};
pub use client::{FetchStats, Lookup, LookupClient, LookupClientBuilder, SessionGuard};
pub use config::EnricherConfig;
pub use enrich::{Enricher, FanOut};
pub use parser::{LeiParser, PayloadParser};
pub use table::Table;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
