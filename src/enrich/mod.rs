//! Concurrent enrichment: fetch payloads for many identifiers at once and
//! merge the parsed fields back onto the rows they came from.
//!
//! # Enrichment Module
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Enricher`] | Orchestrates fetch → parse → positional merge |
//! | [`FanOut`] | How many fetches may be in flight at once |
//! | [`fetch_all`] | Order-preserving concurrent fetch of a batch |
//!
//! ## Ordering
//!
//! Output position `i` always belongs to identifier `i`, duplicates included,
//! whatever order the fetches complete in. Which duplicate reaches the network
//! and which is served from the cache depends on completion timing and is not
//! stable between runs.

mod enricher;
mod fan_out;

pub use enricher::Enricher;
pub use fan_out::{fetch_all, FanOut};
