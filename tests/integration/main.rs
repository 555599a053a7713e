//! Integration tests against a mock GLEIF server.

mod enrichment;
mod lookup;
mod mock_server;
mod runner;
