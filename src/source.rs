//! CSV load/save for tables.

use crate::table::{Cell, Table};
use crate::Result;
use serde_json::{Number, Value};
use std::path::Path;
use tracing::info;

/// Reads and writes tables as CSV with a header row and no index column.
///
/// Cells are typed on load: empty → null, integers and finite floats →
/// numbers, anything else → string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSource;

impl CsvSource {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let table = Self::read(&mut reader)?;
        info!(
            "Data loaded from {} with shape ({}, {})",
            path.display(),
            table.len(),
            table.columns().len()
        );
        Ok(table)
    }

    pub fn load_from_reader<R: std::io::Read>(&self, rdr: R) -> Result<Table> {
        Self::read(&mut csv::Reader::from_reader(rdr))
    }

    fn read<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Table> {
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = Table::new(columns);
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(parse_cell).collect())?;
        }
        Ok(table)
    }

    pub fn save(&self, table: &Table, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        Self::write(table, &mut writer)?;
        info!("Data saved to {}", path.display());
        Ok(())
    }

    pub fn save_to_writer<W: std::io::Write>(&self, table: &Table, wtr: W) -> Result<()> {
        Self::write(table, &mut csv::Writer::from_writer(wtr))
    }

    fn write<W: std::io::Write>(table: &Table, writer: &mut csv::Writer<W>) -> Result<()> {
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(render_cell))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn parse_cell(raw: &str) -> Cell {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
