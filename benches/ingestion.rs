use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use tabular_io::ingestion::{DelimitedOptions, read_delimited, stream_delimited};

fn sample_csv(rows: usize) -> String {
    let mut data = String::from("id,name,score,active\n");
    for i in 0..rows {
        data.push_str(&format!("{i},row{i},{}.5,true\n", i % 100));
    }
    data
}

fn bench_read_delimited(c: &mut Criterion) {
    let data = sample_csv(1_000);
    let options = DelimitedOptions::default();

    c.bench_function("read_delimited_1k_rows", |b| {
        b.iter(|| read_delimited(black_box(data.as_bytes()), &options).unwrap())
    });
}

fn bench_stream_delimited(c: &mut Criterion) {
    let data = sample_csv(1_000);
    let options = DelimitedOptions {
        chunk_size: 64,
        ..Default::default()
    };

    c.bench_function("stream_delimited_1k_rows_chunk_64", |b| {
        b.iter(|| {
            let mut rows = 0usize;
            stream_delimited(
                black_box(data.as_bytes()),
                |chunk| {
                    if let tabular_io::ingestion::Chunk::Block(table) = chunk {
                        rows += table.row_count();
                    }
                },
                &options,
            )
            .unwrap();
            rows
        })
    });
}

criterion_group!(benches, bench_read_delimited, bench_stream_delimited);
criterion_main!(benches);
