//! `tabular-io` ingests tabular data (delimited text or JSON) from local,
//! remote, or in-memory sources into an in-memory columnar [`types::Table`]
//! with per-column type inference, and serializes tables back to delimited
//! text or JSON.
//!
//! The primary entrypoints are [`ingestion::read_delimited`] (bulk),
//! [`ingestion::stream_delimited`] / [`ingestion::chunked_delimited`]
//! (chunked), and [`ingestion::read_structured`] (JSON); emission goes through
//! [`emission::write_delimited`] and [`emission::write_structured`].
//!
//! ## What you can ingest
//!
//! **Sources** (classified once at the boundary, see [`source::Source`]):
//!
//! - local paths: `"data/people.csv"`
//! - remote URLs: `"https://example.com/people.csv"` (GET by default)
//! - in-memory bytes: `b"a,b\n1,2\n".as_slice()`
//! - open handles: `std::fs::File` or any `Read + Send` via
//!   [`source::Source::reader`]
//!
//! **Dtypes** are inferred per column with fixed precedence
//! int32 > float32 > boolean > string:
//!
//! - [`types::DType::Int32`]
//! - [`types::DType::Float32`]
//! - [`types::DType::Bool`]
//! - [`types::DType::Utf8`]
//!
//! Empty cells and JSON `null` map to [`types::Value::Null`].
//!
//! ## Quick examples
//!
//! ```
//! use tabular_io::ingestion::{read_delimited, DelimitedOptions};
//! use tabular_io::types::{DType, Value};
//!
//! # fn main() -> Result<(), tabular_io::TableError> {
//! let table = read_delimited(b"a,b\n1,2\n3,4\n".as_slice(), &DelimitedOptions::default())?;
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.columns()[0].dtype, DType::Int32);
//! assert_eq!(table.columns()[1].values, vec![Value::Int32(2), Value::Int32(4)]);
//! # Ok(())
//! # }
//! ```
//!
//! Chunked ingestion delivers single-block tables in strict row order and a
//! typed end marker:
//!
//! ```
//! use tabular_io::ingestion::{stream_delimited, Chunk, DelimitedOptions};
//!
//! # fn main() -> Result<(), tabular_io::TableError> {
//! let mut deliveries = 0;
//! stream_delimited(
//!     b"a\n1\n2\n3\n".as_slice(),
//!     |_chunk: Chunk| deliveries += 1,
//!     &DelimitedOptions::default(),
//! )?;
//! // Three one-row blocks plus the end marker.
//! assert_eq!(deliveries, 4);
//! # Ok(())
//! # }
//! ```
//!
//! Emission borrows the table and negotiates a destination: return value,
//! file write, or an injected [`emission::EmitSink`]:
//!
//! ```
//! use tabular_io::emission::{write_delimited, EmitOptions};
//! use tabular_io::ingestion::{read_delimited, DelimitedOptions};
//!
//! # fn main() -> Result<(), tabular_io::TableError> {
//! let table = read_delimited(b"a,b\n1,2\n3,4\n".as_slice(), &DelimitedOptions::default())?;
//! let text = write_delimited(&table, &EmitOptions::default())?.unwrap();
//! assert_eq!(text, "a,b\n1,2\n3,4\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: bulk/chunked delimited and JSON ingestion, plus observers
//! - [`emission`]: delimited and JSON emission, plus sinks
//! - [`source`]: source classification and resolution
//! - [`infer`]: per-column dtype inference
//! - [`types`]: the columnar table model
//! - [`error`]: error types used across the crate
//!
//! ## Error model
//!
//! Structural and source errors ([`TableError::Param`],
//! [`TableError::NotFound`], [`TableError::Http`], [`TableError::Transport`],
//! [`TableError::MalformedRow`], [`TableError::Shape`],
//! [`TableError::DuplicateColumn`]) fail the call; a failed bulk ingestion
//! never returns a partially built table, while chunked ingestion may have
//! delivered valid blocks before the failure. Per-cell cast problems are
//! recovered as nulls and reported through the observer
//! ([`ingestion::TableObserver::on_cast_failures`]), never failing the call.

pub mod emission;
pub mod error;
pub mod infer;
pub mod ingestion;
pub mod source;
pub mod types;

pub use error::{CastFailure, TableError, TableResult};
