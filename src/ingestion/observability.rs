use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CastFailure, TableError};

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// The kind of input an ingestion was asked to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Delimited text (CSV and friends).
    Delimited,
    /// Structured JSON.
    Structured,
}

/// Context about an ingestion attempt.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Description of the input source (path, URL, or a placeholder for
    /// in-memory/handle inputs).
    pub source: String,
    /// Format used for ingestion.
    pub format: SourceFormat,
}

/// Minimal stats reported on successful ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestStats {
    /// Number of ingested rows.
    pub rows: usize,
    /// Number of cells recovered as null after a failed cast.
    pub cast_failures: usize,
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait TableObserver: Send + Sync {
    /// Called when ingestion succeeds. For chunked ingestion this fires once,
    /// after the final block.
    fn on_success(&self, _ctx: &SourceContext, _stats: IngestStats) {}

    /// Called when ingestion fails.
    fn on_failure(&self, _ctx: &SourceContext, _severity: Severity, _error: &TableError) {}

    /// Called when an ingestion failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &SourceContext, severity: Severity, error: &TableError) {
        self.on_failure(ctx, severity, error)
    }

    /// Called with the cells of a batch that failed to cast and were stored as
    /// null. Fires at most once per bulk ingestion and once per chunk.
    fn on_cast_failures(&self, _ctx: &SourceContext, _failures: &[CastFailure]) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn TableObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn TableObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl TableObserver for CompositeObserver {
    fn on_success(&self, ctx: &SourceContext, stats: IngestStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &SourceContext, severity: Severity, error: &TableError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &SourceContext, severity: Severity, error: &TableError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }

    fn on_cast_failures(&self, ctx: &SourceContext, failures: &[CastFailure]) {
        for o in &self.observers {
            o.on_cast_failures(ctx, failures);
        }
    }
}

/// Logs ingestion events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl TableObserver for StdErrObserver {
    fn on_success(&self, ctx: &SourceContext, stats: IngestStats) {
        eprintln!(
            "[ingest][ok] format={:?} source={} rows={} cast_failures={}",
            ctx.format, ctx.source, stats.rows, stats.cast_failures
        );
    }

    fn on_failure(&self, ctx: &SourceContext, severity: Severity, error: &TableError) {
        eprintln!(
            "[ingest][{:?}] format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        );
    }

    fn on_alert(&self, ctx: &SourceContext, severity: Severity, error: &TableError) {
        eprintln!(
            "[ALERT][ingest][{:?}] format={:?} source={} err={}",
            severity, ctx.format, ctx.source, error
        );
    }

    fn on_cast_failures(&self, ctx: &SourceContext, failures: &[CastFailure]) {
        for failure in failures {
            eprintln!(
                "[ingest][cast] source={} row={} column={} dtype={} raw='{}'",
                ctx.source, failure.row, failure.column, failure.dtype, failure.raw
            );
        }
    }
}

/// Appends ingestion events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl TableObserver for FileObserver {
    fn on_success(&self, ctx: &SourceContext, stats: IngestStats) {
        self.append_line(&format!(
            "{} ok format={:?} source={} rows={} cast_failures={}",
            unix_ts(),
            ctx.format,
            ctx.source,
            stats.rows,
            stats.cast_failures
        ));
    }

    fn on_failure(&self, ctx: &SourceContext, severity: Severity, error: &TableError) {
        self.append_line(&format!(
            "{} fail severity={:?} format={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.source,
            error
        ));
    }

    fn on_alert(&self, ctx: &SourceContext, severity: Severity, error: &TableError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} format={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            ctx.source,
            error
        ));
    }

    fn on_cast_failures(&self, ctx: &SourceContext, failures: &[CastFailure]) {
        for failure in failures {
            self.append_line(&format!(
                "{} cast source={} row={} column={} dtype={} raw='{}'",
                unix_ts(),
                ctx.source,
                failure.row,
                failure.column,
                failure.dtype,
                failure.raw
            ));
        }
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Severity classification for a failed ingestion.
pub(crate) fn severity_for_error(e: &TableError) -> Severity {
    match e {
        TableError::NotFound { .. } | TableError::Io(_) | TableError::Transport { .. } => {
            Severity::Critical
        }
        TableError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => Severity::Critical,
            _ => Severity::Error,
        },
        _ => Severity::Error,
    }
}

/// Report a failed ingestion to `observer`, alerting at or above `threshold`.
pub(crate) fn report_failure(
    observer: Option<&Arc<dyn TableObserver>>,
    threshold: Severity,
    ctx: &SourceContext,
    error: &TableError,
) {
    if let Some(obs) = observer {
        let severity = severity_for_error(error);
        obs.on_failure(ctx, severity, error);
        if severity >= threshold {
            obs.on_alert(ctx, severity, error);
        }
    }
}
