//! Structured (JSON) emission.

use crate::error::TableResult;
use crate::types::Table;

use super::{EmitOptions, Layout, deliver};

/// Serialize a table as JSON.
///
/// - [`Layout::Row`]: an array with one object per row, each mapping column
///   name to that row's value.
/// - [`Layout::Column`]: one object mapping each column name to its full
///   ordered value sequence.
///
/// Nulls serialize as JSON `null`. Returns `Some(value)` when neither a
/// destination nor a sink is configured, `None` after the (pretty-printed)
/// bytes have been handed off.
///
/// # Examples
///
/// ```
/// use tabular_io::emission::{write_structured, EmitOptions, Layout};
/// use tabular_io::ingestion::{read_delimited, DelimitedOptions};
///
/// # fn main() -> Result<(), tabular_io::TableError> {
/// let table = read_delimited(b"a,b\n1,2\n3,4\n".as_slice(), &DelimitedOptions::default())?;
///
/// let options = EmitOptions { layout: Layout::Column, ..Default::default() };
/// let value = write_structured(&table, &options)?.unwrap();
/// assert_eq!(value, serde_json::json!({"a": [1, 3], "b": [2, 4]}));
/// # Ok(())
/// # }
/// ```
pub fn write_structured(
    table: &Table,
    options: &EmitOptions,
) -> TableResult<Option<serde_json::Value>> {
    let value = match options.layout {
        Layout::Row => render_rows(table)?,
        Layout::Column => render_columns(table)?,
    };

    let bytes = serde_json::to_vec_pretty(&value)?;
    if deliver(&bytes, "json", options)? {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

fn render_columns(table: &Table) -> TableResult<serde_json::Value> {
    let mut map = serde_json::Map::with_capacity(table.column_count());
    for col in table.columns() {
        map.insert(col.name.clone(), serde_json::to_value(&col.values)?);
    }
    Ok(serde_json::Value::Object(map))
}

fn render_rows(table: &Table) -> TableResult<serde_json::Value> {
    let mut rows = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        let mut record = serde_json::Map::with_capacity(table.column_count());
        for col in table.columns() {
            record.insert(col.name.clone(), serde_json::to_value(&col.values[row])?);
        }
        rows.push(serde_json::Value::Object(record));
    }
    Ok(serde_json::Value::Array(rows))
}
