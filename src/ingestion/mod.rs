//! Ingestion entrypoints and implementations.
//!
//! - [`read_delimited`]: bulk delimited ingestion into a [`crate::types::Table`]
//! - [`chunked_delimited`] / [`stream_delimited`]: chunked delimited ingestion
//! - [`read_structured`]: JSON ingestion
//!
//! All entry points accept anything convertible into a
//! [`crate::source::Source`] (paths, URLs, byte buffers, open handles) and can
//! report success/failure/alerts to a [`TableObserver`].

mod builder;
pub mod delimited;
pub mod json;
pub mod observability;
pub mod stream;

pub use delimited::{DelimitedOptions, read_delimited};
pub use json::{StructuredOptions, read_structured};
pub use observability::{
    CompositeObserver, FileObserver, IngestStats, Severity, SourceContext, SourceFormat,
    StdErrObserver, TableObserver,
};
pub use stream::{Chunk, Chunks, chunked_delimited, stream_delimited};
