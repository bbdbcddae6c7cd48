//! Emission sinks.
//!
//! The environment-specific destination for serialized artifacts (a browser
//! download trigger, an object store, ...) is modelled as an injected
//! capability so the serializer never depends on a presentation environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Destination capability for serialized artifacts.
pub trait EmitSink: Send + Sync {
    /// Deliver the serialized bytes under `name`.
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// A sink that writes named artifacts into a directory, creating it on first
/// use.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// Create a sink rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl EmitSink for DirSink {
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(name), bytes)
    }
}
