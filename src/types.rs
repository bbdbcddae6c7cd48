//! Core data model types.
//!
//! Ingestion produces an in-memory column-major [`Table`]: an ordered list of
//! named, typed [`Column`]s of equal length. Column dtypes are inferred during
//! ingestion (see [`crate::infer`]); the table itself only stores and validates.

use std::fmt;

use serde::Serialize;

use crate::error::{TableError, TableResult};

/// Storage type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// 32-bit signed integer.
    Int32,
    /// 32-bit floating point number.
    Float32,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int32 => "int32",
            DType::Float32 => "float32",
            DType::Bool => "bool",
            DType::Utf8 => "utf8",
        };
        f.write_str(name)
    }
}

/// A single typed cell value.
///
/// Serializes untagged, so JSON emission gets plain scalars (`Null` becomes
/// JSON `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 32-bit signed integer.
    Int32(i32),
    /// 32-bit float.
    Float32(f32),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Whether this value may be stored under `dtype`. `Null` fits every dtype.
    pub fn conforms_to(&self, dtype: DType) -> bool {
        matches!(
            (self, dtype),
            (Value::Null, _)
                | (Value::Int32(_), DType::Int32)
                | (Value::Float32(_), DType::Float32)
                | (Value::Bool(_), DType::Bool)
                | (Value::Utf8(_), DType::Utf8)
        )
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Renders the value the way delimited emission writes it; `Null` is empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(v) => f.write_str(v),
        }
    }
}

/// A named, typed, ordered sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Storage type; every value is `Null` or matches it.
    pub dtype: DType,
    /// Cell values, in row order.
    pub values: Vec<Value>,
}

impl Column {
    /// Create a new column.
    pub fn new(name: impl Into<String>, dtype: DType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    /// Number of values in the column.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// In-memory column-major table.
///
/// Invariants, enforced by [`Table::new`]:
///
/// - column names are unique; order is first-seen
/// - all columns have the same length
/// - every value is `Null` or matches its column's dtype
///
/// The serializer only ever borrows a table; nothing in this crate mutates one
/// after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table from columns, validating the invariants above.
    pub fn new(columns: Vec<Column>) -> TableResult<Self> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(TableError::DuplicateColumn {
                    name: col.name.clone(),
                });
            }
        }

        if let Some(first) = columns.first() {
            let rows = first.len();
            for col in &columns {
                if col.len() != rows {
                    return Err(TableError::Shape {
                        message: format!(
                            "column '{}' has {} values, expected {}",
                            col.name,
                            col.len(),
                            rows
                        ),
                    });
                }
            }
        }

        for col in &columns {
            for (idx, value) in col.values.iter().enumerate() {
                if !value.conforms_to(col.dtype) {
                    return Err(TableError::Shape {
                        message: format!(
                            "column '{}' value at row {} does not match dtype {}",
                            col.name,
                            idx + 1,
                            col.dtype
                        ),
                    });
                }
            }
        }

        Ok(Self { columns })
    }

    /// An empty table (no columns, no rows).
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (the shared column length).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// True if the table holds no columns at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, DType, Table, Value};
    use crate::error::TableError;

    #[test]
    fn table_new_accepts_consistent_columns() {
        let table = Table::new(vec![
            Column::new("a", DType::Int32, vec![Value::Int32(1), Value::Null]),
            Column::new(
                "b",
                DType::Utf8,
                vec![Value::Utf8("x".to_string()), Value::Utf8("y".to_string())],
            ),
        ])
        .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("b").unwrap().dtype, DType::Utf8);
    }

    #[test]
    fn table_new_rejects_duplicate_names() {
        let err = Table::new(vec![
            Column::new("a", DType::Int32, vec![]),
            Column::new("a", DType::Utf8, vec![]),
        ])
        .unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { name } if name == "a"));
    }

    #[test]
    fn table_new_rejects_ragged_columns() {
        let err = Table::new(vec![
            Column::new("a", DType::Int32, vec![Value::Int32(1)]),
            Column::new("b", DType::Int32, vec![]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("shape mismatch"));
    }

    #[test]
    fn table_new_rejects_value_under_wrong_dtype() {
        let err = Table::new(vec![Column::new(
            "a",
            DType::Int32,
            vec![Value::Utf8("oops".to_string())],
        )])
        .unwrap_err();
        assert!(err.to_string().contains("does not match dtype int32"));
    }

    #[test]
    fn null_conforms_to_every_dtype() {
        for dtype in [DType::Int32, DType::Float32, DType::Bool, DType::Utf8] {
            assert!(Value::Null.conforms_to(dtype));
        }
    }
}
