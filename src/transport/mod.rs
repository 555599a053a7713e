//! Network seam for the lookup client.
//!
//! The client never talks to `reqwest` directly: it asks a [`Connector`] for a
//! [`Transport`] when a session is opened and drops it when the session is
//! closed. Tests plug scripted doubles in at the same point.

mod http;

pub use http::{HttpConfig, HttpConnector, HttpTransport, TransportError};

use async_trait::async_trait;
use std::sync::Arc;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// A live network session able to issue GET requests.
///
/// `Err` means the exchange itself failed (connect, timeout, body read);
/// any status code, including 4xx/5xx, is reported as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<RawResponse, TransportError>;
}

/// Opens sessions. One connector lives as long as the client; each `open()`
/// on the client calls `connect` once.
pub trait Connector: Send + Sync {
    fn connect(&self) -> crate::Result<Arc<dyn Transport>>;
}
