//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `LEI_*` environment variables, then command-line flags (applied by the
//! binary). [`EnricherConfig::validate`] runs once all layers are in place.

use crate::client::DEFAULT_BASE_URL;
use crate::enrich::FanOut;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Only lookup client currently shipped.
pub const LEI_LOOKUP_CLIENT: &str = "LeiLookupClient";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    pub client: String,
    pub cache_size: usize,
    /// Seconds to pause after each successful network fetch.
    pub sleep_rate: f64,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
    pub base_url: String,
    pub timeout_secs: u64,
    pub accept_invalid_certs: bool,
    /// `None` dispatches every identifier at once.
    pub max_concurrency: Option<usize>,
    pub log_level: String,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            client: LEI_LOOKUP_CLIENT.to_string(),
            cache_size: 100,
            sleep_rate: 0.6,
            retry_attempts: 3,
            retry_backoff_ms: 1000,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            accept_invalid_certs: true,
            max_concurrency: None,
            log_level: "INFO".to_string(),
            input_file: PathBuf::from("data/input_dataset.csv"),
            output_file: PathBuf::from("data/output_data.csv"),
        }
    }
}

impl EnricherConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&raw)
    }

    /// Overlay `LEI_*` variables from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay variables from an arbitrary lookup. Unparsable values are
    /// skipped with a warning.
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(
            lookup: &dyn Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            match raw.trim().parse::<T>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("Ignoring unparsable value {:?} for {}", raw, key);
                    None
                }
            }
        }

        let lookup: &dyn Fn(&str) -> Option<String> = &lookup;
        if let Some(v) = parsed(lookup, "LEI_CACHE_SIZE") {
            self.cache_size = v;
        }
        if let Some(v) = parsed(lookup, "LEI_SLEEP_RATE") {
            self.sleep_rate = v;
        }
        if let Some(v) = parsed(lookup, "LEI_RETRY_ATTEMPTS") {
            self.retry_attempts = v;
        }
        if let Some(v) = parsed(lookup, "LEI_RETRY_BACKOFF_MS") {
            self.retry_backoff_ms = v;
        }
        if let Some(v) = parsed(lookup, "LEI_HTTP_TIMEOUT_SECS") {
            self.timeout_secs = v;
        }
        if let Some(v) = parsed(lookup, "LEI_MAX_CONCURRENCY") {
            self.max_concurrency = Some(v);
        }
        if let Some(v) = lookup("LEI_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("LEI_LOG_LEVEL") {
            self.log_level = v;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.client != LEI_LOOKUP_CLIENT {
            return Err(invalid(
                "client",
                format!("client '{}' is not implemented", self.client),
            ));
        }
        if self.cache_size == 0 {
            return Err(invalid("cache_size", "cache size must be a positive integer"));
        }
        if self.retry_attempts == 0 {
            return Err(invalid("retry_attempts", "retry attempts must be a positive integer"));
        }
        self.sleep_rate_duration()?;
        if self.max_concurrency == Some(0) {
            return Err(invalid("max_concurrency", "max concurrency must be at least 1"));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| invalid("base_url", format!("invalid base URL: {}", e)))?;
        crate::telemetry::parse_level(&self.log_level)?;
        Ok(())
    }

    pub fn sleep_rate_duration(&self) -> Result<Duration> {
        if !self.sleep_rate.is_finite() || self.sleep_rate < 0.0 {
            return Err(invalid(
                "sleep_rate",
                format!("sleep rate must be a non-negative number of seconds, got {}", self.sleep_rate),
            ));
        }
        Ok(Duration::from_secs_f64(self.sleep_rate))
    }

    pub fn fan_out(&self) -> FanOut {
        match self.max_concurrency {
            Some(n) => FanOut::Bounded { max_concurrency: n },
            None => FanOut::Unbounded,
        }
    }
}

fn invalid(field: &str, msg: impl Into<String>) -> Error {
    Error::configuration_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(format!("config.{}", field))
            .with_source("config"),
    )
}
