use std::sync::{Arc, Mutex};

use tabular_io::TableError;
use tabular_io::error::CastFailure;
use tabular_io::ingestion::{
    Chunk, DelimitedOptions, SourceContext, TableObserver, chunked_delimited, stream_delimited,
};
use tabular_io::types::{DType, Value};

#[test]
fn chunk_size_one_delivers_one_block_per_row_plus_end() {
    let deliveries = Mutex::new(Vec::new());

    stream_delimited(
        b"n\n1\n2\n3\n".as_slice(),
        |chunk| deliveries.lock().unwrap().push(chunk),
        &DelimitedOptions::default(),
    )
    .unwrap();

    let deliveries = deliveries.into_inner().unwrap();
    // N data rows at chunk_size = 1: N blocks plus the end marker.
    assert_eq!(deliveries.len(), 4);
    for (i, chunk) in deliveries.iter().take(3).enumerate() {
        match chunk {
            Chunk::Block(table) => {
                assert_eq!(table.row_count(), 1);
                assert_eq!(table.columns()[0].values, vec![Value::Int32(i as i32 + 1)]);
            }
            Chunk::End => panic!("end marker delivered early"),
        }
    }
    assert_eq!(deliveries[3], Chunk::End);
}

#[test]
fn chunk_size_two_partitions_rows_in_order() {
    let options = DelimitedOptions {
        chunk_size: 2,
        ..Default::default()
    };
    let blocks: Vec<_> = chunked_delimited(b"n\n1\n2\n3\n".as_slice(), &options)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(
        blocks[0].columns()[0].values,
        vec![Value::Int32(1), Value::Int32(2)]
    );
    assert_eq!(blocks[1].columns()[0].values, vec![Value::Int32(3)]);
}

#[test]
fn empty_source_delivers_only_the_end_marker() {
    let deliveries = Mutex::new(Vec::new());

    stream_delimited(
        b"".as_slice(),
        |chunk| deliveries.lock().unwrap().push(chunk),
        &DelimitedOptions::default(),
    )
    .unwrap();

    assert_eq!(deliveries.into_inner().unwrap(), vec![Chunk::End]);
}

#[derive(Default)]
struct CastRecorder {
    failures: Mutex<Vec<CastFailure>>,
}

impl TableObserver for CastRecorder {
    fn on_cast_failures(&self, _ctx: &SourceContext, failures: &[CastFailure]) {
        self.failures.lock().unwrap().extend_from_slice(failures);
    }
}

#[test]
fn dtypes_carry_forward_from_the_first_block() {
    let recorder = Arc::new(CastRecorder::default());
    let options = DelimitedOptions {
        chunk_size: 2,
        observer: Some(recorder.clone()),
        ..Default::default()
    };

    // First block is all integers; the third row no longer fits int32.
    let blocks: Vec<_> = chunked_delimited(b"n\n1\n2\noops\n4\n".as_slice(), &options)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(blocks[0].columns()[0].dtype, DType::Int32);
    assert_eq!(blocks[1].columns()[0].dtype, DType::Int32);
    assert_eq!(
        blocks[1].columns()[0].values,
        vec![Value::Null, Value::Int32(4)]
    );

    let failures = recorder.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].raw, "oops");
    assert_eq!(failures[0].column, "n");
    assert_eq!(failures[0].row, 4);
}

#[test]
fn malformed_row_mid_stream_fails_after_prior_blocks() {
    let mut chunks =
        chunked_delimited(b"a,b\n1,2\n3\n".as_slice(), &DelimitedOptions::default()).unwrap();

    let first = chunks.next().unwrap().unwrap();
    assert_eq!(first.row_count(), 1);

    let err = chunks.next().unwrap().unwrap_err();
    assert!(matches!(err, TableError::MalformedRow { row: 3, .. }));

    // The sequence is fused after an error.
    assert!(chunks.next().is_none());
}

#[test]
fn stream_delimited_surfaces_mid_stream_errors_without_end_marker() {
    let deliveries = Mutex::new(Vec::new());

    let err = stream_delimited(
        b"a,b\n1,2\n3\n".as_slice(),
        |chunk| deliveries.lock().unwrap().push(chunk),
        &DelimitedOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, TableError::MalformedRow { .. }));
    let deliveries = deliveries.into_inner().unwrap();
    // The first block was already delivered and remains valid; no end marker.
    assert_eq!(deliveries.len(), 1);
    assert!(matches!(&deliveries[0], Chunk::Block(t) if t.row_count() == 1));
}

#[test]
fn preview_limit_applies_across_blocks() {
    let options = DelimitedOptions {
        chunk_size: 2,
        preview_rows: Some(3),
        ..Default::default()
    };
    let blocks: Vec<_> = chunked_delimited(b"n\n1\n2\n3\n4\n5\n".as_slice(), &options)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let total: usize = blocks.iter().map(|t| t.row_count()).sum();
    assert_eq!(total, 3);
    assert_eq!(blocks.len(), 2);
}
