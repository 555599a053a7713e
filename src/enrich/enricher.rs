use super::fan_out::{fetch_all, FanOut};
use crate::client::Lookup;
use crate::parser::PayloadParser;
use crate::table::Table;
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use tracing::info;

/// Fetches payloads for a column of identifiers and appends the parsed fields
/// to the table.
pub struct Enricher {
    client: Arc<dyn Lookup>,
    parser: Arc<dyn PayloadParser>,
    fan_out: FanOut,
}

impl Enricher {
    pub fn new(client: Arc<dyn Lookup>, parser: Arc<dyn PayloadParser>) -> Self {
        Self {
            client,
            parser,
            fan_out: FanOut::default(),
        }
    }

    pub fn with_fan_out(mut self, fan_out: FanOut) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn fan_out(&self) -> FanOut {
        self.fan_out
    }

    /// Enrich `table` with one parsed record per entry of `ids`.
    ///
    /// `ids[i]` must describe row `i`. The row index is reset to `0..n` before
    /// the merge, so labels the caller attached are dropped. Rows whose fetch
    /// produced nothing get null fields.
    pub async fn enrich(&self, mut table: Table, ids: &[String]) -> Result<Table> {
        if ids.len() != table.len() {
            return Err(Error::validation_with_context(
                "identifier count does not match row count",
                ErrorContext::new()
                    .with_details(format!("{} identifiers for {} rows", ids.len(), table.len()))
                    .with_source("enricher"),
            ));
        }

        let payloads = fetch_all(self.client.as_ref(), ids, self.fan_out).await?;
        let absent = payloads.iter().filter(|p| p.is_none()).count();
        info!(
            "Fetched {} of {} identifiers ({} without data)",
            payloads.len() - absent,
            payloads.len(),
            absent
        );

        let parsed = self.parser.parse_data(&payloads);
        if parsed.len() != payloads.len() {
            return Err(Error::validation_with_context(
                "parser returned a different number of records than payloads",
                ErrorContext::new()
                    .with_details(format!("{} records for {} payloads", parsed.len(), payloads.len()))
                    .with_source("enricher"),
            ));
        }

        table.reset_index();
        table.hconcat(parsed)
    }

    /// Enrich using the identifiers found in `column`.
    pub async fn enrich_column(&self, table: Table, column: &str) -> Result<Table> {
        let ids = table.column_strings(column)?;
        self.enrich(table, &ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LeiParser;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    struct Fixed(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl Lookup for Fixed {
        async fn fetch(&self, id: &str) -> Result<Option<String>> {
            Ok(self.0.get(id).map(|s| s.to_string()))
        }
    }

    struct Closed;

    #[async_trait]
    impl Lookup for Closed {
        async fn fetch(&self, _: &str) -> Result<Option<String>> {
            Err(Error::SessionClosed)
        }
    }

    const E1: &str = r#"{"data": [{"attributes": {"entity": {"legalName": {"name": "Company 1"}, "legalAddress": {"country": "GB"}}, "bic": ["1234"]}}]}"#;

    fn table(ids: &[&str]) -> Table {
        Table::from_rows(
            vec!["lei".into(), "notional".into()],
            ids.iter()
                .enumerate()
                .map(|(i, id)| vec![json!(id), json!(i as i64 * 100)])
                .collect(),
        )
        .unwrap()
    }

    fn enricher(lookup: impl Lookup + 'static) -> Enricher {
        Enricher::new(Arc::new(lookup), Arc::new(LeiParser::new()))
    }

    #[tokio::test]
    async fn test_merges_by_position_and_resets_index() {
        let lookup = Fixed([("E1", E1)].into_iter().collect());
        let input = table(&["E1", "E2"]).with_index(vec![10, 42]).unwrap();

        let out = enricher(lookup).enrich_column(input, "lei").await.unwrap();

        assert_eq!(out.columns(), ["lei", "notional", "legal_name", "bic", "country"]);
        assert_eq!(out.index(), [0, 1]);
        assert_eq!(
            out.rows()[0],
            vec![json!("E1"), json!(0), json!("Company 1"), json!("1234"), json!("GB")]
        );
        assert_eq!(
            out.rows()[1],
            vec![json!("E2"), json!(100), Value::Null, Value::Null, Value::Null]
        );
    }

    #[tokio::test]
    async fn test_duplicates_each_get_a_record() {
        let lookup = Fixed([("A", E1)].into_iter().collect());
        let out = enricher(lookup)
            .with_fan_out(FanOut::Bounded { max_concurrency: 1 })
            .enrich_column(table(&["A", "B", "A"]), "lei")
            .await
            .unwrap();
        assert_eq!(out.get(0, "legal_name"), Some(&json!("Company 1")));
        assert_eq!(out.get(1, "legal_name"), Some(&Value::Null));
        assert_eq!(out.get(0, "legal_name"), out.get(2, "legal_name"));
    }

    #[tokio::test]
    async fn test_mismatched_identifiers_rejected() {
        let lookup = Fixed(HashMap::new());
        let err = enricher(lookup)
            .enrich(table(&["A", "B"]), &["A".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[tokio::test]
    async fn test_lookup_error_aborts_batch() {
        let err = enricher(Closed)
            .enrich_column(table(&["A"]), "lei")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SessionClosed));
    }

    #[tokio::test]
    async fn test_empty_table() {
        let out = enricher(Fixed(HashMap::new()))
            .enrich_column(table(&[]), "lei")
            .await
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns().len(), 5);
    }
}
