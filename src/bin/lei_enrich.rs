//! lei-enrich: enrich a CSV of trades with GLEIF entity data and compute
//! transaction costs.

use anyhow::{Context, Result};
use clap::Parser;
use lei_enricher::runner::{RunOutcome, Runner};
use lei_enricher::{telemetry, EnricherConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lei-enrich")]
#[command(about = "Enrich trade data with legal entity information", version)]
struct Args {
    /// Lookup client implementation
    #[arg(long)]
    client: Option<String>,

    /// Number of responses kept in the FIFO cache
    #[arg(long)]
    cache_size: Option<usize>,

    /// Seconds to pause after each successful request
    #[arg(long)]
    sleep_rate: Option<f64>,

    /// Attempts per identifier before giving up
    #[arg(long)]
    retry_attempts: Option<u32>,

    /// DEBUG, INFO, WARNING or ERROR
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    input_file: Option<PathBuf>,

    #[arg(long)]
    output_file: Option<PathBuf>,

    /// Cap on in-flight lookups (unbounded when omitted)
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// YAML file applied before environment variables and flags
    #[arg(long, env = "LEI_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    fn resolve(self) -> Result<EnricherConfig> {
        let base = match &self.config {
            Some(path) => EnricherConfig::from_yaml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EnricherConfig::default(),
        };
        let mut config = base.with_env();

        if let Some(v) = self.client {
            config.client = v;
        }
        if let Some(v) = self.cache_size {
            config.cache_size = v;
        }
        if let Some(v) = self.sleep_rate {
            config.sleep_rate = v;
        }
        if let Some(v) = self.retry_attempts {
            config.retry_attempts = v;
        }
        if let Some(v) = self.log_level {
            config.log_level = v;
        }
        if let Some(v) = self.input_file {
            config.input_file = v;
        }
        if let Some(v) = self.output_file {
            config.output_file = v;
        }
        if let Some(v) = self.max_concurrency {
            config.max_concurrency = Some(v);
        }
        Ok(config)
    }
}

fn boxify(lines: &[String]) -> String {
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let border = format!("+{}+", "-".repeat(width + 2));
    let mut out = vec![border.clone()];
    out.extend(lines.iter().map(|l| format!("| {:<width$} |", l, width = width)));
    out.push(border);
    out.join("\n")
}

fn summary(config: &EnricherConfig) -> String {
    let concurrency = config
        .max_concurrency
        .map_or_else(|| "unbounded".to_string(), |n| n.to_string());
    boxify(&[
        "Arguments".to_string(),
        format!("client: {}", config.client),
        format!("cache_size: {}", config.cache_size),
        format!("sleep_rate: {}", config.sleep_rate),
        format!("retry_attempts: {}", config.retry_attempts),
        format!("log_level: {}", config.log_level),
        format!("input_file: {}", config.input_file.display()),
        format!("output_file: {}", config.output_file.display()),
        format!("max_concurrency: {}", concurrency),
    ])
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().resolve()?;
    config.validate()?;
    telemetry::init_tracing(&config.log_level)?;

    println!("{}", summary(&config));

    let runner = Runner::new(config)?;
    match runner.run().await? {
        RunOutcome::Completed { rows, output } => {
            tracing::info!("Enriched {} rows into {}", rows, output.display());
            Ok(())
        }
        RunOutcome::InvalidInput => anyhow::bail!("input data failed validation"),
        RunOutcome::InvalidOutput => anyhow::bail!("output data failed validation"),
    }
}
