//! Payload parsing: raw lookup responses to flat records.

use crate::table::{Cell, Table};
use crate::utils::json_path::PathMapper;
use serde_json::Value;
use tracing::{error, warn};

/// Maps an ordered sequence of payloads to a table with exactly one row per
/// payload, in the same order. Must not fail: anything it cannot read becomes
/// a row of nulls.
pub trait PayloadParser: Send + Sync {
    fn columns(&self) -> Vec<String>;
    fn parse_data(&self, payloads: &[Option<String>]) -> Table;
}

/// Output fields and the paths they are read from in a GLEIF `lei-records`
/// document.
const LEI_FIELDS: [(&str, &str); 3] = [
    ("legal_name", "data[0].attributes.entity.legalName.name"),
    ("bic", "data[0].attributes.bic[0]"),
    ("country", "data[0].attributes.entity.legalAddress.country"),
];

/// Parser for GLEIF responses producing `legal_name`, `bic` and `country`.
///
/// A field missing from an otherwise readable document becomes an empty
/// string. An absent payload, invalid JSON, or a document whose root is not an
/// object yields nulls for every field.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeiParser;

impl LeiParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_one(&self, payload: Option<&str>) -> Vec<Cell> {
        let Some(raw) = payload else {
            return Self::null_row();
        };
        let doc: Value = match serde_json::from_str(raw) {
            Ok(doc) => doc,
            Err(e) => {
                error!("Error occurred while parsing data: {}", e);
                return Self::null_row();
            }
        };
        if !doc.is_object() {
            error!("Error occurred while parsing data: expected a JSON object at the root");
            return Self::null_row();
        }
        if !Self::has_record_shape(&doc) {
            error!("Error occurred while parsing data: 'data' is not a list of records");
            return Self::null_row();
        }

        LEI_FIELDS
            .iter()
            .map(|(name, path)| match PathMapper::get_string(&doc, path) {
                Some(v) => Value::String(v),
                None => {
                    warn!("Failed to parse {} from data: nothing at {}", name, path);
                    Value::String(String::new())
                }
            })
            .collect()
    }

    // A missing `data` key or an empty list still yields per-field
    // fallbacks; `data` of any other type, or a first entry that is not an
    // object, makes the whole document unreadable.
    fn has_record_shape(doc: &Value) -> bool {
        match doc.get("data") {
            None => true,
            Some(Value::Array(records)) => records.first().map_or(true, Value::is_object),
            Some(_) => false,
        }
    }

    fn null_row() -> Vec<Cell> {
        vec![Value::Null; LEI_FIELDS.len()]
    }
}

impl PayloadParser for LeiParser {
    fn columns(&self) -> Vec<String> {
        LEI_FIELDS.iter().map(|(name, _)| name.to_string()).collect()
    }

    fn parse_data(&self, payloads: &[Option<String>]) -> Table {
        let mut table = Table::new(self.columns());
        for payload in payloads {
            let pushed = table.push_row(self.parse_one(payload.as_deref()));
            debug_assert!(pushed.is_ok(), "parsed row width must match the column count");
        }
        table
    }
}
