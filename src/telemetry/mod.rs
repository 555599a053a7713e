//! Logging setup.
//!
//! Library code only emits `tracing` events; binaries call [`init_tracing`]
//! once at startup. `RUST_LOG`, when set, takes precedence over the configured
//! level so individual modules can be turned up without touching config.

use crate::{Error, ErrorContext, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Level names accepted in configuration, case-insensitive.
pub const LOG_LEVELS: [&str; 4] = ["DEBUG", "INFO", "WARNING", "ERROR"];

pub fn parse_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_ascii_uppercase().as_str() {
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARNING" | "WARN" => Ok(LevelFilter::WARN),
        "ERROR" => Ok(LevelFilter::ERROR),
        _ => Err(Error::configuration_with_context(
            format!("Invalid log level: {}", level),
            ErrorContext::new()
                .with_field_path("config.log_level")
                .with_details(format!("expected one of {}", LOG_LEVELS.join(", ")))
                .with_source("telemetry"),
        )),
    }
}

/// Install the global fmt subscriber. Calling it twice is harmless; the second
/// call leaves the first subscriber in place.
pub fn init_tracing(level: &str) -> Result<()> {
    let level = parse_level(level)?;
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
    Ok(())
}
