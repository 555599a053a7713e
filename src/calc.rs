//! Per-row derived fields.

use crate::table::{Cell, Table};
use crate::{Error, ErrorContext, Result};
use futures::future::try_join_all;
use serde_json::{Number, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Read-only view of one table row addressed by column name.
pub struct RowView<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl<'a> RowView<'a> {
    pub fn new(columns: &'a [String], cells: &'a [Cell]) -> Self {
        Self { columns, cells }
    }

    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        let pos = self.columns.iter().position(|c| c == column)?;
        self.cells.get(pos)
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_f64)
    }

    pub fn get_str(&self, column: &str) -> Option<&'a str> {
        self.get(column).and_then(Value::as_str)
    }
}

/// Computes one value per row. `None` leaves the cell null.
pub trait Formula: Send + Sync {
    fn apply(&self, row: &RowView<'_>) -> Option<f64>;
}

/// Transaction costs by legal-address country:
///
/// - `GB`: `notional * rate - notional`
/// - `NL`: `|notional * (1 / rate) - notional|`
/// - anything else: no value
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionCostsFormula;

impl Formula for TransactionCostsFormula {
    fn apply(&self, row: &RowView<'_>) -> Option<f64> {
        let country = row.get_str("country").unwrap_or_default();
        let (Some(notional), Some(rate)) = (row.get_f64("notional"), row.get_f64("rate")) else {
            warn!("No transaction costs calculated: notional or rate missing for country {:?}", country);
            return None;
        };

        match country {
            "GB" => {
                let costs = notional * rate - notional;
                info!("Transaction costs calculated for country 'GB': {}", costs);
                Some(costs)
            }
            "NL" => {
                let costs = (notional * (1.0 / rate) - notional).abs();
                info!("Transaction costs calculated for country 'NL': {}", costs);
                Some(costs)
            }
            other => {
                warn!("No transaction costs calculated for unknown country: {}", other);
                None
            }
        }
    }
}

/// Evaluate `formula` for every row on the blocking pool and store the
/// results in `column`, in row order. Non-finite results are stored as null.
pub async fn calculate(table: Table, column: &str, formula: Arc<dyn Formula>) -> Result<Table> {
    let rows = table.len();
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let chunk = rows.div_ceil(workers).max(1);
    let shared = Arc::new(table);

    let handles = (0..rows).step_by(chunk).map(|start| {
        let table = shared.clone();
        let formula = formula.clone();
        let end = (start + chunk).min(rows);
        tokio::task::spawn_blocking(move || {
            table.rows()[start..end]
                .iter()
                .map(|cells| formula.apply(&RowView::new(table.columns(), cells)))
                .collect::<Vec<_>>()
        })
    });

    let chunks = try_join_all(handles).await.map_err(|e| {
        Error::runtime_with_context(
            "formula worker failed",
            ErrorContext::new()
                .with_details(e.to_string())
                .with_source("calculate"),
        )
    })?;

    let values: Vec<Cell> = chunks
        .into_iter()
        .flatten()
        .map(|v| v.and_then(Number::from_f64).map_or(Value::Null, Value::Number))
        .collect();

    let mut table = Arc::try_unwrap(shared).unwrap_or_else(|arc| (*arc).clone());
    table.set_column(column, values)?;
    Ok(table)
}
