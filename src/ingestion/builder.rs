//! Columnar table assembly.
//!
//! Transposes parsed rows into column-major storage, casting each token to its
//! column's dtype. Field counts are validated by the row reader before rows
//! reach this module; what is enforced here is name uniqueness and the cast
//! recovery policy: a cell that fails its cast is stored as null and recorded
//! as a [`CastFailure`], never aborting the ingestion.

use csv::StringRecord;

use crate::error::{CastFailure, TableError, TableResult};
use crate::infer::infer_dtype;
use crate::types::{Column, DType, Table, Value};

/// A built table plus the per-cell casts that were recovered as null.
#[derive(Debug)]
pub(crate) struct BuildOutcome {
    pub(crate) table: Table,
    pub(crate) cast_failures: Vec<CastFailure>,
}

/// Infer one dtype per column over `rows`, then assemble.
///
/// `first_row` is the 1-based line number of `rows[0]` in the source, used for
/// cast-failure reporting.
pub(crate) fn build_inferred(
    names: &[String],
    rows: &[StringRecord],
    first_row: usize,
) -> TableResult<BuildOutcome> {
    let dtypes = infer_columns(names.len(), rows);
    build_typed(names, &dtypes, rows, first_row)
}

/// Infer a dtype for each of `width` columns by scanning every row's token.
pub(crate) fn infer_columns(width: usize, rows: &[StringRecord]) -> Vec<DType> {
    (0..width)
        .map(|idx| infer_dtype(rows.iter().map(|record| record.get(idx).unwrap_or(""))))
        .collect()
}

/// Assemble rows under known dtypes.
pub(crate) fn build_typed(
    names: &[String],
    dtypes: &[DType],
    rows: &[StringRecord],
    first_row: usize,
) -> TableResult<BuildOutcome> {
    for (i, name) in names.iter().enumerate() {
        if names[..i].iter().any(|n| n == name) {
            return Err(TableError::DuplicateColumn { name: name.clone() });
        }
    }

    let mut values: Vec<Vec<Value>> = names
        .iter()
        .map(|_| Vec::with_capacity(rows.len()))
        .collect();
    let mut cast_failures = Vec::new();

    for (offset, record) in rows.iter().enumerate() {
        let row_num = first_row + offset;
        for (idx, (name, dtype)) in names.iter().zip(dtypes.iter()).enumerate() {
            let raw = record.get(idx).unwrap_or("");
            match cast_token(raw, *dtype) {
                Some(value) => values[idx].push(value),
                None => {
                    cast_failures.push(CastFailure {
                        row: row_num,
                        column: name.clone(),
                        dtype: *dtype,
                        raw: raw.to_string(),
                    });
                    values[idx].push(Value::Null);
                }
            }
        }
    }

    let columns = names
        .iter()
        .zip(dtypes.iter())
        .zip(values)
        .map(|((name, dtype), values)| Column::new(name.clone(), *dtype, values))
        .collect();

    Ok(BuildOutcome {
        table: Table::new(columns)?,
        cast_failures,
    })
}

/// Cast one raw token under a dtype. Empty tokens are nulls; `None` means the
/// cast failed.
///
/// Utf8 keeps the token byte-for-byte so delimited round-trips stay verbatim;
/// the other dtypes parse the trimmed token.
pub(crate) fn cast_token(raw: &str, dtype: DType) -> Option<Value> {
    let token = raw.trim();
    if token.is_empty() {
        return Some(Value::Null);
    }
    match dtype {
        DType::Utf8 => Some(Value::Utf8(raw.to_string())),
        DType::Int32 => token.parse::<i32>().ok().map(Value::Int32),
        DType::Float32 => token.parse::<f32>().ok().map(Value::Float32),
        DType::Bool => {
            if token.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if token.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use csv::StringRecord;

    use super::{build_inferred, build_typed, cast_token};
    use crate::types::{DType, Value};

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn build_inferred_transposes_and_types_columns() {
        let names = vec!["a".to_string(), "b".to_string()];
        let rows = vec![record(&["1", "x"]), record(&["2", "y"])];
        let out = build_inferred(&names, &rows, 2).unwrap();

        let table = out.table;
        assert!(out.cast_failures.is_empty());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.columns()[0].dtype, DType::Int32);
        assert_eq!(
            table.columns()[0].values,
            vec![Value::Int32(1), Value::Int32(2)]
        );
        assert_eq!(table.columns()[1].dtype, DType::Utf8);
    }

    #[test]
    fn build_typed_recovers_failed_casts_as_null() {
        let names = vec!["n".to_string()];
        let rows = vec![record(&["1"]), record(&["oops"]), record(&["3"])];
        let out = build_typed(&names, &[DType::Int32], &rows, 5).unwrap();

        assert_eq!(
            out.table.columns()[0].values,
            vec![Value::Int32(1), Value::Null, Value::Int32(3)]
        );
        assert_eq!(out.cast_failures.len(), 1);
        assert_eq!(out.cast_failures[0].row, 6);
        assert_eq!(out.cast_failures[0].raw, "oops");
    }

    #[test]
    fn build_rejects_duplicate_names() {
        let names = vec!["a".to_string(), "a".to_string()];
        let err = build_inferred(&names, &[record(&["1", "2"])], 1).unwrap_err();
        assert!(err.to_string().contains("duplicate column name 'a'"));
    }

    #[test]
    fn cast_token_treats_empty_as_null() {
        assert_eq!(cast_token("", DType::Int32), Some(Value::Null));
        assert_eq!(cast_token("  ", DType::Bool), Some(Value::Null));
    }
}
