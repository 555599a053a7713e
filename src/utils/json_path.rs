//! Dot-notation path lookup for JSON documents.
//!
//! Supports nested keys (`a.b.c`), bracket indexing (`data[0].bic[0]`),
//! dot indexing (`data.0.bic`) and an optional leading `$.`.

use serde_json::Value;

pub struct PathMapper;

impl PathMapper {
    /// Get value from JSON using dot-notation path (supports array indexing).
    pub fn get_path<'a>(obj: &'a Value, path: &str) -> Option<&'a Value> {
        if path.trim().is_empty() {
            return None;
        }

        let normalized = path.trim().trim_start_matches("$.");
        let mut current = obj;

        for part in normalized.split('.') {
            if part.is_empty() {
                return None;
            }

            // "key[0][1]": object key followed by one or more indices
            let (key, mut rest) = match part.find('[') {
                Some(pos) => (&part[..pos], &part[pos..]),
                None => (part, ""),
            };

            if !key.is_empty() {
                current = match current {
                    Value::Object(map) => map.get(key)?,
                    Value::Array(arr) => arr.get(key.parse::<usize>().ok()?)?,
                    _ => return None,
                };
            }

            while let Some(stripped) = rest.strip_prefix('[') {
                let end = stripped.find(']')?;
                let idx = stripped[..end].parse::<usize>().ok()?;
                current = match current {
                    Value::Array(arr) => arr.get(idx)?,
                    _ => return None,
                };
                rest = &stripped[end + 1..];
            }
            if !rest.is_empty() {
                return None;
            }
        }

        Some(current)
    }

    /// String at `path`; non-string scalars are rendered as JSON text.
    pub fn get_string(obj: &Value, path: &str) -> Option<String> {
        Self::get_path(obj, path).and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => serde_json::to_string(other).ok(),
        })
    }
}
