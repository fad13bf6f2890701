//! Benchmarks for index and encoder operations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rift_core::{DuplexEncoder, Polarity, RiftIndex};

fn populated(size: u32) -> RiftIndex {
    let mut index = RiftIndex::new();
    for key in 1..=size {
        index.insert(key, key as u8, 1.0, Polarity::Positive);
    }
    index
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_insert");

    for size in [100u32, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(populated(size)));
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let index = populated(10_000);

    let mut group = c.benchmark_group("index_lookup");

    group.bench_function("existing_key", |b| {
        b.iter(|| black_box(index.find(black_box(5_000))));
    });

    group.bench_function("missing_key", |b| {
        b.iter(|| black_box(index.find(black_box(20_000))));
    });

    group.finish();
}

fn bench_measurement(c: &mut Criterion) {
    c.bench_function("mark_measurement", |b| {
        let mut index = populated(10_000);
        let mut key = 0u32;
        b.iter(|| {
            key = key % 10_000 + 1;
            black_box(index.mark_measurement(key, 0.9, Some(Polarity::Positive)))
        });
    });
}

fn bench_encode(c: &mut Criterion) {
    let input: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();

    let mut group = c.benchmark_group("duplex_encode");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("64k", |b| {
        b.iter(|| {
            let mut index = RiftIndex::new();
            let mut encoder = DuplexEncoder::new();
            let out = encoder.encode(&mut index, black_box(&input), Polarity::Positive);
            black_box((out, index))
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_lookup,
    bench_measurement,
    bench_encode,
);

criterion_main!(benches);
