//! Structural checks before and after enrichment.

use crate::table::Table;
use serde_json::Value;
use tracing::{info, warn};

pub const INPUT_COLUMNS: [&str; 3] = ["lei", "notional", "rate"];
pub const OUTPUT_COLUMNS: [&str; 6] = [
    "lei",
    "notional",
    "rate",
    "legal_name",
    "country",
    "transaction_costs",
];

/// Validates tables at the pipeline boundaries. Checks never fail hard; they
/// log the reason and return `false`.
pub trait DataValidator: Send + Sync {
    fn validate_input(&self, table: &Table) -> bool;
    fn validate_output(&self, table: &Table) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LeiValidator;

impl LeiValidator {
    pub fn new() -> Self {
        Self
    }

    fn missing_columns<'a>(table: &Table, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|c| !table.has_column(c))
            .collect()
    }

    // Numeric unless some cell is neither a number nor null.
    fn is_numeric(table: &Table, column: &str) -> bool {
        table
            .column(column)
            .map(|cells| cells.iter().all(|c| c.is_number() || c.is_null()))
            .unwrap_or(false)
    }

    fn has_nulls(table: &Table, column: &str) -> bool {
        table
            .column(column)
            .map(|cells| cells.iter().any(|c| matches!(c, Value::Null)))
            .unwrap_or(true)
    }
}

impl DataValidator for LeiValidator {
    fn validate_input(&self, table: &Table) -> bool {
        let missing = Self::missing_columns(table, &INPUT_COLUMNS);
        if !missing.is_empty() {
            warn!("Input data does not match the expected structure!");
            warn!("Missing columns: {}", missing.join(", "));
            return false;
        }

        if !Self::is_numeric(table, "notional") || !Self::is_numeric(table, "rate") {
            warn!("Columns 'notional' and 'rate' should be numeric!");
            return false;
        }

        info!("Input data validated successfully!");
        true
    }

    fn validate_output(&self, table: &Table) -> bool {
        let missing = Self::missing_columns(table, &OUTPUT_COLUMNS);
        if !missing.is_empty() {
            warn!("Output data does not match the expected structure!");
            warn!("Missing columns: {}", missing.join(", "));
            return false;
        }

        if Self::has_nulls(table, "legal_name") || Self::has_nulls(table, "country") {
            warn!("Some rows have not been correctly enriched!");
            return false;
        }

        info!("Output data validated successfully!");
        true
    }
}
