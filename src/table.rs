//! In-memory tabular data: named columns, positional rows, a row index.

use crate::{Error, ErrorContext, Result};
use serde_json::Value;

/// One cell. `Value::Null` marks a missing value.
pub type Cell = Value;
pub type Row = Vec<Cell>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    /// Row labels; `0..len` unless the caller supplied others.
    index: Vec<usize>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Replace the row labels, e.g. after the caller filtered rows.
    pub fn with_index(mut self, index: Vec<usize>) -> Result<Self> {
        if index.len() != self.rows.len() {
            return Err(shape_error(
                "index",
                format!("index has {} labels for {} rows", index.len(), self.rows.len()),
            ));
        }
        self.index = index;
        Ok(self)
    }

    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(shape_error(
                "row",
                format!("row has {} cells, table has {} columns", row.len(), self.columns.len()),
            ));
        }
        self.index.push(self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let pos = self.column_position(name)?;
        Some(self.rows.iter().map(|r| &r[pos]).collect())
    }

    /// Column values rendered as strings; nulls become empty strings.
    pub fn column_strings(&self, name: &str) -> Result<Vec<String>> {
        let cells = self.column(name).ok_or_else(|| missing_column(name))?;
        Ok(cells
            .into_iter()
            .map(|c| match c {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect())
    }

    /// Look up a cell by row position and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let pos = self.column_position(column)?;
        self.rows.get(row).map(|r| &r[pos])
    }

    /// Set a column, overwriting it if the name already exists.
    pub fn set_column(&mut self, name: &str, cells: Vec<Cell>) -> Result<()> {
        if cells.len() != self.rows.len() {
            return Err(shape_error(
                name,
                format!("column has {} cells, table has {} rows", cells.len(), self.rows.len()),
            ));
        }
        match self.column_position(name) {
            Some(pos) => {
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row[pos] = cell;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row.push(cell);
                }
            }
        }
        Ok(())
    }

    /// Renumber rows `0..len`, dropping the previous labels.
    pub fn reset_index(&mut self) {
        self.index = (0..self.rows.len()).collect();
    }

    /// Append `other`'s columns row by row. Both tables must have the same
    /// number of rows; the result keeps `self`'s index.
    pub fn hconcat(mut self, other: Table) -> Result<Table> {
        if self.rows.len() != other.rows.len() {
            return Err(shape_error(
                "hconcat",
                format!("left has {} rows, right has {}", self.rows.len(), other.rows.len()),
            ));
        }
        self.columns.extend(other.columns);
        for (row, extra) in self.rows.iter_mut().zip(other.rows) {
            row.extend(extra);
        }
        Ok(self)
    }
}

pub(crate) fn missing_column(name: &str) -> Error {
    Error::validation_with_context(
        format!("column '{}' not found", name),
        ErrorContext::new()
            .with_field_path(format!("table.{}", name))
            .with_source("table"),
    )
}

fn shape_error(field: &str, details: String) -> Error {
    Error::validation_with_context(
        "table shape mismatch",
        ErrorContext::new()
            .with_field_path(format!("table.{}", field))
            .with_details(details)
            .with_source("table"),
    )
}
