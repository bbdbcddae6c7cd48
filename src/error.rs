use std::path::PathBuf;

use thiserror::Error;

use crate::types::DType;

/// Convenience result type for ingestion and emission operations.
pub type TableResult<T> = Result<T, TableError>;

/// Error type returned by ingestion and emission functions.
///
/// This is a single error enum shared across delimited and JSON paths. Structural
/// and source errors are fatal to the call that raised them; per-cell cast
/// problems are not errors at all (see [`CastFailure`]).
#[derive(Debug, Error)]
pub enum TableError {
    /// The input is not a path, URL, or recognized handle.
    #[error("unsupported input: {message}")]
    Param { message: String },

    /// A local path does not exist or is not readable.
    #[error("cannot open '{}': {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A remote source answered with a non-success status.
    #[error("http status {status} fetching {url}")]
    Http { status: u16, url: String },

    /// A remote fetch failed below HTTP (DNS, refused connection, timeout).
    #[error("transport failure fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A data row's field count disagrees with the header.
    ///
    /// `row` is the 1-based line number in the source (the header, when present,
    /// is line 1).
    #[error("row {row} has {found} fields, expected {expected}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Table construction invariant violation (unequal column lengths, a value
    /// stored under the wrong dtype, ...).
    #[error("shape mismatch: {message}")]
    Shape { message: String },

    /// Two columns share a name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// Underlying I/O error (e.g. failed read from an already-open handle).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited parsing error from the csv layer.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single cell that could not be cast to its column's dtype.
///
/// Cast problems are recovered inline: the cell is stored as
/// [`crate::types::Value::Null`], the failure is collected, and the batch of
/// failures is reported through the observer. They never abort an ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct CastFailure {
    /// 1-based line number in the source (the header, when present, is line 1).
    pub row: usize,
    /// Column name.
    pub column: String,
    /// The dtype the cell was expected to cast into.
    pub dtype: DType,
    /// The raw token as read from the source.
    pub raw: String,
}
