//! Delimited-text ingestion, bulk mode.
//!
//! [`read_delimited`] resolves the source, reads every data row (or up to the
//! preview limit), infers one dtype per column over the whole column, and
//! assembles a [`Table`]. A failed bulk ingestion never returns a partially
//! built table.
//!
//! The row-reading plumbing ([`RowReader`]) is shared with chunked mode
//! (see [`super::stream`]).

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use csv::StringRecord;

use crate::error::{TableError, TableResult};
use crate::source::Source;
use crate::types::Table;

use super::builder::{BuildOutcome, build_inferred};
use super::observability::{
    IngestStats, Severity, SourceContext, SourceFormat, TableObserver, report_failure,
};

/// Options controlling delimited ingestion.
///
/// Use [`Default`] for common cases: comma separator, header row present,
/// no preview limit, chunk size 1.
#[derive(Clone)]
pub struct DelimitedOptions {
    /// Field separator byte.
    pub separator: u8,
    /// Whether the first row is a header naming the columns.
    pub has_header: bool,
    /// Cap on the number of data rows materialized; the source is released
    /// once the cap is reached.
    pub preview_rows: Option<usize>,
    /// Explicit column names. Overrides the header row (which is still
    /// consumed); required to name columns of headerless input, otherwise
    /// names are generated as `column_0`, `column_1`, ...
    pub column_names: Option<Vec<String>>,
    /// Rows per block in chunked mode. Ignored by [`read_delimited`].
    pub chunk_size: usize,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn TableObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for DelimitedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelimitedOptions")
            .field("separator", &(self.separator as char))
            .field("has_header", &self.has_header)
            .field("preview_rows", &self.preview_rows)
            .field("column_names", &self.column_names)
            .field("chunk_size", &self.chunk_size)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            has_header: true,
            preview_rows: None,
            column_names: None,
            chunk_size: 1,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Ingest delimited text into an in-memory [`Table`], reading the whole source.
///
/// - The header row (when `has_header`) is consumed as column names, overridden
///   by `column_names` if supplied.
/// - An empty source yields the header-derived columns with zero rows, or a
///   fully empty table when there is no header.
/// - A row whose field count disagrees with the header fails the call with
///   [`TableError::MalformedRow`].
///
/// # Examples
///
/// ```
/// use tabular_io::ingestion::{read_delimited, DelimitedOptions};
/// use tabular_io::types::{DType, Value};
///
/// # fn main() -> Result<(), tabular_io::TableError> {
/// let table = read_delimited(b"a,b\n1,2\n3,4\n".as_slice(), &DelimitedOptions::default())?;
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.columns()[0].dtype, DType::Int32);
/// assert_eq!(table.columns()[0].values, vec![Value::Int32(1), Value::Int32(3)]);
/// # Ok(())
/// # }
/// ```
///
/// Paths and URLs are classified automatically:
///
/// ```no_run
/// use tabular_io::ingestion::{read_delimited, DelimitedOptions};
///
/// # fn main() -> Result<(), tabular_io::TableError> {
/// let local = read_delimited("data/people.csv", &DelimitedOptions::default())?;
/// let remote = read_delimited("https://example.com/people.csv", &DelimitedOptions::default())?;
/// # Ok(())
/// # }
/// ```
pub fn read_delimited(
    source: impl Into<Source>,
    options: &DelimitedOptions,
) -> TableResult<Table> {
    let source = source.into();
    let ctx = SourceContext {
        source: source.describe(),
        format: SourceFormat::Delimited,
    };

    match read_delimited_inner(source, options) {
        Ok(outcome) => {
            if let Some(obs) = options.observer.as_ref() {
                if !outcome.cast_failures.is_empty() {
                    obs.on_cast_failures(&ctx, &outcome.cast_failures);
                }
                obs.on_success(
                    &ctx,
                    IngestStats {
                        rows: outcome.table.row_count(),
                        cast_failures: outcome.cast_failures.len(),
                    },
                );
            }
            Ok(outcome.table)
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

fn read_delimited_inner(source: Source, options: &DelimitedOptions) -> TableResult<BuildOutcome> {
    let mut reader = RowReader::open(source, options)?;
    let first_row = reader.next_row();
    let rows = reader.read_rows(None)?;
    let names = reader.names().to_vec();
    build_inferred(&names, &rows, first_row)
}

/// Incremental row reader shared by bulk and chunked ingestion.
///
/// Handles header consumption, name generation, the preview cap, and
/// field-count validation. Row numbers are 1-based source line numbers, so the
/// header (when present) is line 1.
pub(crate) struct RowReader {
    rdr: csv::Reader<Box<dyn Read + Send>>,
    names: Option<Vec<String>>,
    next_row: usize,
    rows_read: usize,
    preview_rows: Option<usize>,
}

impl RowReader {
    pub(crate) fn open(source: Source, options: &DelimitedOptions) -> TableResult<Self> {
        let reader = source.resolve()?;
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(options.separator)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut names = options.column_names.clone();
        let mut next_row = 1;
        if options.has_header {
            let mut record = StringRecord::new();
            if rdr.read_record(&mut record)? {
                if names.is_none() {
                    names = Some(record.iter().map(str::to_string).collect());
                }
                next_row = 2;
            }
        }

        Ok(Self {
            rdr,
            names,
            next_row,
            rows_read: 0,
            preview_rows: options.preview_rows,
        })
    }

    /// Column names. Empty until the first row of headerless, unnamed input
    /// has been read (names are then generated from its width).
    pub(crate) fn names(&self) -> &[String] {
        self.names.as_deref().unwrap_or(&[])
    }

    /// 1-based source line number of the next data row.
    pub(crate) fn next_row(&self) -> usize {
        self.next_row
    }

    /// Read up to `limit` data rows (all remaining when `None`), honoring the
    /// preview cap across calls. An empty result means the source (or the cap)
    /// is exhausted.
    pub(crate) fn read_rows(&mut self, limit: Option<usize>) -> TableResult<Vec<StringRecord>> {
        let mut rows = Vec::new();
        let mut record = StringRecord::new();

        loop {
            if let Some(cap) = self.preview_rows {
                if self.rows_read >= cap {
                    break;
                }
            }
            if let Some(limit) = limit {
                if rows.len() >= limit {
                    break;
                }
            }
            if !self.rdr.read_record(&mut record)? {
                break;
            }

            let row_num = self.next_row;
            self.next_row += 1;

            let expected = match &self.names {
                Some(names) => names.len(),
                None => {
                    let generated = (0..record.len()).map(|i| format!("column_{i}")).collect();
                    self.names = Some(generated);
                    record.len()
                }
            };
            if record.len() != expected {
                return Err(TableError::MalformedRow {
                    row: row_num,
                    expected,
                    found: record.len(),
                });
            }

            self.rows_read += 1;
            rows.push(record.clone());
        }

        Ok(rows)
    }
}
