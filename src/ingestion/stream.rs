//! Delimited-text ingestion, chunked mode.
//!
//! [`chunked_delimited`] resolves the source once and hands back [`Chunks`]:
//! a lazy, single-pass sequence of [`Table`] blocks the caller drives. Blocks
//! arrive in strict row order; handling of block N completes before block N+1
//! is read from the source. [`stream_delimited`] is the callback-style driver
//! on top, delivering one [`Chunk::Block`] per block and a final
//! [`Chunk::End`].
//!
//! Dtypes are inferred on the first block and carried forward: later blocks
//! cast into the carried dtypes and record a cast failure (stored null) for
//! any cell that no longer fits. This keeps the schema stable across the
//! chunk sequence at the cost of sampling only the first block.

use std::sync::Arc;

use crate::error::{TableError, TableResult};
use crate::source::Source;
use crate::types::{DType, Table};

use super::builder::{BuildOutcome, build_inferred, build_typed};
use super::delimited::{DelimitedOptions, RowReader};
use super::observability::{
    IngestStats, Severity, SourceContext, SourceFormat, TableObserver, report_failure,
};

/// One delivery from [`stream_delimited`].
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    /// A block of rows, built into a single-block table.
    Block(Table),
    /// End of stream; no further deliveries follow.
    End,
}

/// Ingest delimited text in blocks of `chunk_size` rows.
///
/// Header handling is identical to [`super::read_delimited`] and applies once,
/// before the first block. Fails immediately (without yielding a sequence) if
/// the source cannot be resolved.
pub fn chunked_delimited(
    source: impl Into<Source>,
    options: &DelimitedOptions,
) -> TableResult<Chunks> {
    let source = source.into();
    let ctx = SourceContext {
        source: source.describe(),
        format: SourceFormat::Delimited,
    };

    let reader = match RowReader::open(source, options) {
        Ok(reader) => reader,
        Err(error) => {
            report_failure(
                options.observer.as_ref(),
                options.alert_at_or_above,
                &ctx,
                &error,
            );
            return Err(error);
        }
    };

    Ok(Chunks {
        reader: Some(reader),
        dtypes: None,
        chunk_size: options.chunk_size.max(1),
        total_rows: 0,
        total_cast_failures: 0,
        ctx,
        observer: options.observer.clone(),
        alert_at_or_above: options.alert_at_or_above,
    })
}

/// Ingest delimited text in blocks, driving a caller-supplied callback.
///
/// The callback is invoked once per block with [`Chunk::Block`], in strict row
/// order, and once more with [`Chunk::End`] after the final block: N data rows
/// at `chunk_size = 1` mean exactly N+1 invocations. A mid-stream error is
/// returned without the end marker; blocks already delivered remain valid.
///
/// # Examples
///
/// ```
/// use tabular_io::ingestion::{stream_delimited, Chunk, DelimitedOptions};
///
/// # fn main() -> Result<(), tabular_io::TableError> {
/// let mut blocks = 0;
/// let mut ended = false;
/// stream_delimited(
///     b"a,b\n1,2\n3,4\n".as_slice(),
///     |chunk| match chunk {
///         Chunk::Block(table) => blocks += table.row_count(),
///         Chunk::End => ended = true,
///     },
///     &DelimitedOptions::default(),
/// )?;
/// assert_eq!(blocks, 2);
/// assert!(ended);
/// # Ok(())
/// # }
/// ```
pub fn stream_delimited<F>(
    source: impl Into<Source>,
    mut on_chunk: F,
    options: &DelimitedOptions,
) -> TableResult<()>
where
    F: FnMut(Chunk),
{
    let mut chunks = chunked_delimited(source, options)?;
    for block in &mut chunks {
        on_chunk(Chunk::Block(block?));
    }
    on_chunk(Chunk::End);
    Ok(())
}

/// Lazy sequence of single-block tables. Finite, single-pass, not restartable.
///
/// Yields `Err` at most once; the sequence is fused afterwards. Dropping the
/// sequence early releases the underlying source.
pub struct Chunks {
    reader: Option<RowReader>,
    dtypes: Option<Vec<DType>>,
    chunk_size: usize,
    total_rows: usize,
    total_cast_failures: usize,
    ctx: SourceContext,
    observer: Option<Arc<dyn TableObserver>>,
    alert_at_or_above: Severity,
}

impl Chunks {
    fn finish(&mut self) {
        self.reader = None;
        if let Some(obs) = self.observer.as_ref() {
            obs.on_success(
                &self.ctx,
                IngestStats {
                    rows: self.total_rows,
                    cast_failures: self.total_cast_failures,
                },
            );
        }
    }

    fn fail(&mut self, error: &TableError) {
        self.reader = None;
        report_failure(
            self.observer.as_ref(),
            self.alert_at_or_above,
            &self.ctx,
            error,
        );
    }

    fn build_block(
        &mut self,
        names: &[String],
        rows: &[csv::StringRecord],
        first_row: usize,
    ) -> TableResult<BuildOutcome> {
        match &self.dtypes {
            Some(dtypes) => build_typed(names, dtypes, rows, first_row),
            None => {
                let outcome = build_inferred(names, rows, first_row)?;
                self.dtypes = Some(outcome.table.columns().iter().map(|c| c.dtype).collect());
                Ok(outcome)
            }
        }
    }
}

impl Iterator for Chunks {
    type Item = TableResult<Table>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let first_row = reader.next_row();

        let rows = match reader.read_rows(Some(self.chunk_size)) {
            Ok(rows) => rows,
            Err(error) => {
                self.fail(&error);
                return Some(Err(error));
            }
        };
        if rows.is_empty() {
            self.finish();
            return None;
        }

        let names = self.reader.as_ref().map(|r| r.names().to_vec())?;
        match self.build_block(&names, &rows, first_row) {
            Ok(outcome) => {
                self.total_rows += outcome.table.row_count();
                self.total_cast_failures += outcome.cast_failures.len();
                if !outcome.cast_failures.is_empty() {
                    if let Some(obs) = self.observer.as_ref() {
                        obs.on_cast_failures(&self.ctx, &outcome.cast_failures);
                    }
                }
                Some(Ok(outcome.table))
            }
            Err(error) => {
                self.fail(&error);
                Some(Err(error))
            }
        }
    }
}
