//! Emission entrypoints and implementations.
//!
//! - [`write_delimited`]: delimited-text emission
//! - [`write_structured`]: JSON emission in row or column layout
//!
//! Both resolve their destination the same way: a configured file path wins,
//! then an injected [`EmitSink`], and otherwise the serialized value is
//! returned to the caller. The table is only borrowed; emission never mutates
//! it.

pub mod delimited;
pub mod json;
pub mod sink;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::TableResult;

pub use delimited::write_delimited;
pub use json::write_structured;
pub use sink::{DirSink, EmitSink};

/// Serialization layout for structured emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One record per row, each mapping column name to that row's value.
    #[default]
    Row,
    /// One entry per column, mapping its name to the full value sequence.
    Column,
}

/// Options controlling emission behavior.
#[derive(Clone)]
pub struct EmitOptions {
    /// Field separator byte for delimited emission.
    pub separator: u8,
    /// Layout for structured emission. Ignored by [`write_delimited`].
    pub layout: Layout,
    /// Write the serialized bytes to this path (a canonical extension is
    /// appended when the path has none) instead of returning them.
    pub destination: Option<PathBuf>,
    /// Hand the serialized bytes to this sink when no destination is set.
    pub sink: Option<Arc<dyn EmitSink>>,
    /// Artifact name used with `sink`. Defaults to `output` + the canonical
    /// extension.
    pub sink_name: Option<String>,
}

impl fmt::Debug for EmitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitOptions")
            .field("separator", &(self.separator as char))
            .field("layout", &self.layout)
            .field("destination", &self.destination)
            .field("sink_set", &self.sink.is_some())
            .field("sink_name", &self.sink_name)
            .finish()
    }
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            separator: b',',
            layout: Layout::default(),
            destination: None,
            sink: None,
            sink_name: None,
        }
    }
}

/// Deliver serialized bytes to the configured destination or sink.
///
/// Returns `true` when the bytes were handed off, `false` when the caller
/// should receive the serialized value directly.
pub(crate) fn deliver(bytes: &[u8], extension: &str, options: &EmitOptions) -> TableResult<bool> {
    if let Some(destination) = &options.destination {
        std::fs::write(with_extension(destination, extension), bytes)?;
        return Ok(true);
    }
    if let Some(sink) = &options.sink {
        let name = options
            .sink_name
            .clone()
            .unwrap_or_else(|| "output".to_string());
        let name = with_extension(Path::new(&name), extension)
            .to_string_lossy()
            .into_owned();
        sink.write(&name, bytes)?;
        return Ok(true);
    }
    Ok(false)
}

fn with_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(extension)
    }
}
