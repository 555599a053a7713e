//! End-to-end pipeline: load, validate, enrich, calculate, validate, save.

use crate::calc::{calculate, Formula, TransactionCostsFormula};
use crate::client::{Lookup, LookupClient, LookupClientBuilder};
use crate::config::EnricherConfig;
use crate::enrich::Enricher;
use crate::parser::LeiParser;
use crate::source::CsvSource;
use crate::validate::{DataValidator, LeiValidator};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Column holding the identifiers to look up.
pub const ID_COLUMN: &str = "lei";
/// Column the formula result is written to.
pub const COSTS_COLUMN: &str = "transaction_costs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { rows: usize, output: PathBuf },
    /// Input failed validation; nothing was fetched or written.
    InvalidInput,
    /// Enriched data failed validation; nothing was written.
    InvalidOutput,
}

pub struct Runner {
    config: EnricherConfig,
    client: Arc<LookupClient>,
    enricher: Enricher,
    source: CsvSource,
    validator: Arc<dyn DataValidator>,
    formula: Arc<dyn Formula>,
}

impl Runner {
    pub fn new(config: EnricherConfig) -> Result<Self> {
        config.validate()?;
        let client = Arc::new(LookupClientBuilder::from_config(&config)?.build()?);
        Ok(Self::with_client(config, client))
    }

    /// Use a pre-built client (custom connector, shared cache, ...).
    pub fn with_client(config: EnricherConfig, client: Arc<LookupClient>) -> Self {
        info!("Initializing the components...");
        let lookup: Arc<dyn Lookup> = client.clone();
        let enricher = Enricher::new(lookup, Arc::new(LeiParser::new())).with_fan_out(config.fan_out());
        Self {
            config,
            client,
            enricher,
            source: CsvSource::new(),
            validator: Arc::new(LeiValidator::new()),
            formula: Arc::new(TransactionCostsFormula),
        }
    }

    pub fn client(&self) -> &LookupClient {
        &self.client
    }

    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        info!("Starting the enrichment process...");
        let table = self.source.load(&self.config.input_file)?;

        if !self.validator.validate_input(&table) {
            error!("Input data validation failed!");
            return Ok(RunOutcome::InvalidInput);
        }

        let enriched = {
            let _session = self.client.session()?;
            self.enricher.enrich_column(table, ID_COLUMN).await?
        };
        info!("Lookup stats: {:?}", self.client.stats());

        let table = calculate(enriched, COSTS_COLUMN, self.formula.clone()).await?;

        if !self.validator.validate_output(&table) {
            error!("Output data validation failed!");
            return Ok(RunOutcome::InvalidOutput);
        }

        self.source.save(&table, &self.config.output_file)?;
        Ok(RunOutcome::Completed {
            rows: table.len(),
            output: self.config.output_file.clone(),
        })
    }
}
