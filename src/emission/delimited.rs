//! Delimited-text emission.

use crate::error::{TableError, TableResult};
use crate::types::Table;

use super::{EmitOptions, deliver};

/// Serialize a table as delimited text: a header line of column names
/// followed by one line per row, each newline-terminated. Fields are quoted
/// by the csv layer when they contain the separator, a quote, or a newline.
///
/// A single-column table is emitted as a bare value sequence — no header
/// line, no trailing newline.
///
/// Returns `Some(text)` when neither a destination nor a sink is configured,
/// `None` after the bytes have been handed off.
///
/// # Examples
///
/// ```
/// use tabular_io::emission::{write_delimited, EmitOptions};
/// use tabular_io::ingestion::{read_delimited, DelimitedOptions};
///
/// # fn main() -> Result<(), tabular_io::TableError> {
/// let table = read_delimited(b"a,b\n1,2\n3,4\n".as_slice(), &DelimitedOptions::default())?;
///
/// let options = EmitOptions { separator: b'+', ..Default::default() };
/// let text = write_delimited(&table, &options)?.unwrap();
/// assert_eq!(text, "a+b\n1+2\n3+4\n");
/// # Ok(())
/// # }
/// ```
pub fn write_delimited(table: &Table, options: &EmitOptions) -> TableResult<Option<String>> {
    let text = render_delimited(table, options.separator)?;
    if deliver(text.as_bytes(), "csv", options)? {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

fn render_delimited(table: &Table, separator: u8) -> TableResult<String> {
    if table.is_empty() {
        return Ok(String::new());
    }

    // Series emission: a single column is a bare value sequence.
    if table.column_count() == 1 {
        let rendered: Vec<String> = table.columns()[0]
            .values
            .iter()
            .map(|value| value.to_string())
            .collect();
        return Ok(rendered.join("\n"));
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(separator)
        .from_writer(Vec::new());

    wtr.write_record(table.columns().iter().map(|col| col.name.as_str()))?;
    for row in 0..table.row_count() {
        wtr.write_record(table.columns().iter().map(|col| col.values[row].to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| TableError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::write_delimited;
    use crate::emission::EmitOptions;
    use crate::types::{Column, DType, Table, Value};

    #[test]
    fn single_column_table_emits_bare_values() {
        let table = Table::new(vec![Column::new(
            "n",
            DType::Int32,
            vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)],
        )])
        .unwrap();

        let text = write_delimited(&table, &EmitOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(text, "1\n2\n3");
    }

    #[test]
    fn nulls_emit_as_empty_fields() {
        let table = Table::new(vec![
            Column::new("a", DType::Int32, vec![Value::Int32(1), Value::Null]),
            Column::new(
                "b",
                DType::Utf8,
                vec![Value::Utf8("x".to_string()), Value::Utf8("y".to_string())],
            ),
        ])
        .unwrap();

        let text = write_delimited(&table, &EmitOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(text, "a,b\n1,x\n,y\n");
    }

    #[test]
    fn empty_table_emits_nothing() {
        let text = write_delimited(&Table::empty(), &EmitOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(text, "");
    }
}
