//! Structured (JSON) ingestion.
//!
//! Supported inputs:
//! - A JSON array of objects (row layout): `[{"a":1}, {"a":2}]`. Column order
//!   is first-seen key order; keys missing from a record become null.
//! - A JSON object of arrays (column layout): `{"a":[1,2]}`.
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`.
//!
//! Per the current contract this path reads a remote URL, a local path, or an
//! externally-supplied handle; a raw in-memory buffer is rejected.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use crate::error::{TableError, TableResult};
use crate::source::Source;
use crate::types::{Column, DType, Table, Value};

use super::observability::{
    IngestStats, Severity, SourceContext, SourceFormat, TableObserver, report_failure,
};

/// Options controlling structured ingestion.
#[derive(Clone)]
pub struct StructuredOptions {
    /// HTTP method for remote sources. Defaults to GET.
    pub method: Option<String>,
    /// Extra request headers for remote sources.
    pub headers: Vec<(String, String)>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn TableObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for StructuredOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredOptions")
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for StructuredOptions {
    fn default() -> Self {
        Self {
            method: None,
            headers: Vec::new(),
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Ingest JSON into an in-memory [`Table`].
///
/// # Examples
///
/// ```no_run
/// use tabular_io::ingestion::{read_structured, StructuredOptions};
///
/// # fn main() -> Result<(), tabular_io::TableError> {
/// let table = read_structured("https://example.com/people.json", &StructuredOptions::default())?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn read_structured(
    source: impl Into<Source>,
    options: &StructuredOptions,
) -> TableResult<Table> {
    let mut source = source.into();
    if let Source::RemoteUrl {
        method, headers, ..
    } = &mut source
    {
        if let Some(m) = &options.method {
            *method = m.clone();
        }
        headers.extend(options.headers.iter().cloned());
    }

    let ctx = SourceContext {
        source: source.describe(),
        format: SourceFormat::Structured,
    };

    match read_structured_inner(source) {
        Ok(table) => {
            if let Some(obs) = options.observer.as_ref() {
                obs.on_success(
                    &ctx,
                    IngestStats {
                        rows: table.row_count(),
                        cast_failures: 0,
                    },
                );
            }
            Ok(table)
        }
        Err(error) => {
            report_failure(
                options.observer.as_ref(),
                options.alert_at_or_above,
                &ctx,
                &error,
            );
            Err(error)
        }
    }
}

fn read_structured_inner(source: Source) -> TableResult<Table> {
    if matches!(source, Source::InMemory(_)) {
        return Err(TableError::Param {
            message: "structured ingestion reads a URL, path, or handle, not a raw buffer"
                .to_string(),
        });
    }

    let mut reader = source.resolve()?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    table_from_json_text(&text)
}

/// Parse JSON text into a table. Falls back to NDJSON when the text is not a
/// single JSON value.
pub(crate) fn table_from_json_text(text: &str) -> TableResult<Table> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Table::empty());
    }

    if let Ok(root) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return table_from_json(&root);
    }

    // Fall back to NDJSON.
    let mut records = Vec::new();
    for (i, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| TableError::Param {
            message: format!("invalid ndjson at line {}: {}", i + 1, e),
        })?;
        records.push(v);
    }
    table_from_records(&records)
}

fn table_from_json(root: &serde_json::Value) -> TableResult<Table> {
    match root {
        serde_json::Value::Array(items) => table_from_records(items),
        // An object of arrays is column layout; any other object is a single
        // record.
        serde_json::Value::Object(map) if map.values().all(serde_json::Value::is_array) => {
            table_from_columns(map)
        }
        serde_json::Value::Object(_) => table_from_records(std::slice::from_ref(root)),
        _ => Err(TableError::Param {
            message: "json must be an array of objects or an object of arrays".to_string(),
        }),
    }
}

/// Row layout: an array of objects, one per row.
fn table_from_records(records: &[serde_json::Value]) -> TableResult<Table> {
    let mut names: Vec<String> = Vec::new();
    for (idx0, record) in records.iter().enumerate() {
        let obj = record.as_object().ok_or_else(|| TableError::Param {
            message: format!("row {} is not a json object", idx0 + 1),
        })?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }

    let mut columns = Vec::with_capacity(names.len());
    for name in &names {
        let cells: Vec<Option<&serde_json::Value>> = records
            .iter()
            .map(|record| record.as_object().and_then(|obj| obj.get(name)))
            .collect();
        columns.push(column_from_json(name, &cells));
    }
    Table::new(columns)
}

/// Column layout: one object mapping each name to its full value sequence.
fn table_from_columns(map: &serde_json::Map<String, serde_json::Value>) -> TableResult<Table> {
    let mut columns = Vec::with_capacity(map.len());
    let mut expected_len: Option<usize> = None;

    for (name, value) in map {
        let items = value.as_array().ok_or_else(|| TableError::Param {
            message: format!("column '{name}' is not a json array"),
        })?;
        match expected_len {
            None => expected_len = Some(items.len()),
            Some(len) if len != items.len() => {
                return Err(TableError::Shape {
                    message: format!(
                        "column '{name}' has {} values, expected {len}",
                        items.len()
                    ),
                });
            }
            Some(_) => {}
        }
        let cells: Vec<Option<&serde_json::Value>> = items.iter().map(Some).collect();
        columns.push(column_from_json(name, &cells));
    }
    Table::new(columns)
}

/// Infer a dtype over the column's JSON values and cast them.
///
/// Precedence matches delimited inference (int32 > float32 > boolean >
/// string); a mixed column falls back to Utf8 with non-strings rendered as
/// their JSON text, so no per-cell failure is possible here.
fn column_from_json(name: &str, cells: &[Option<&serde_json::Value>]) -> Column {
    let dtype = infer_json_dtype(cells);
    let values = cells
        .iter()
        .map(|cell| match cell {
            None => Value::Null,
            Some(v) => cast_json(v, dtype),
        })
        .collect();
    Column::new(name, dtype, values)
}

fn infer_json_dtype(cells: &[Option<&serde_json::Value>]) -> DType {
    let mut saw_value = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for cell in cells {
        let v = match cell {
            Some(v) if !v.is_null() => v,
            _ => continue,
        };
        saw_value = true;

        if all_int && !json_is_i32(v) {
            all_int = false;
        }
        if all_float && !v.is_number() {
            all_float = false;
        }
        if all_bool && !v.is_boolean() {
            all_bool = false;
        }
        if !all_int && !all_float && !all_bool {
            return DType::Utf8;
        }
    }

    if !saw_value {
        return DType::Utf8;
    }
    if all_int {
        DType::Int32
    } else if all_float {
        DType::Float32
    } else if all_bool {
        DType::Bool
    } else {
        DType::Utf8
    }
}

fn json_is_i32(v: &serde_json::Value) -> bool {
    v.as_i64()
        .is_some_and(|n| i32::try_from(n).is_ok())
}

fn cast_json(v: &serde_json::Value, dtype: DType) -> Value {
    if v.is_null() {
        return Value::Null;
    }
    match dtype {
        DType::Int32 => v
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Value::Int32)
            .unwrap_or(Value::Null),
        DType::Float32 => v
            .as_f64()
            .map(|n| Value::Float32(n as f32))
            .unwrap_or(Value::Null),
        DType::Bool => v.as_bool().map(Value::Bool).unwrap_or(Value::Null),
        DType::Utf8 => match v.as_str() {
            Some(s) => Value::Utf8(s.to_string()),
            None => Value::Utf8(v.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::table_from_json_text;
    use crate::types::{DType, Value};

    #[test]
    fn records_infer_columns_in_first_seen_order() {
        let table =
            table_from_json_text(r#"[{"a":1,"b":"x"},{"b":"y","a":2,"c":true}]"#).unwrap();
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(table.columns()[0].dtype, DType::Int32);
        // "c" is absent from the first record.
        assert_eq!(table.columns()[2].values[0], Value::Null);
    }

    #[test]
    fn mixed_typed_column_falls_back_to_utf8() {
        let table = table_from_json_text(r#"[{"a":1},{"a":"x"}]"#).unwrap();
        assert_eq!(table.columns()[0].dtype, DType::Utf8);
        assert_eq!(
            table.columns()[0].values,
            vec![Value::Utf8("1".to_string()), Value::Utf8("x".to_string())]
        );
    }

    #[test]
    fn object_of_arrays_is_column_layout() {
        let table = table_from_json_text(r#"{"a":[1,2],"b":[1.5,null]}"#).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns()[1].dtype, DType::Float32);
        assert_eq!(table.columns()[1].values[1], Value::Null);
    }

    #[test]
    fn ragged_column_layout_is_a_shape_error() {
        let err = table_from_json_text(r#"{"a":[1,2],"b":[1]}"#).unwrap_err();
        assert!(err.to_string().contains("shape mismatch"));
    }

    #[test]
    fn scalar_root_is_rejected() {
        let err = table_from_json_text("42").unwrap_err();
        assert!(err.to_string().contains("unsupported input"));
    }
}
