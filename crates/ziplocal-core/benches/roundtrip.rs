//! Benchmarks for pack and extract throughput.
//!
//! Measures walking a tree, serializing it stored and deflated, and
//! extracting it with blocking and non-blocking I/O.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use std::fs;
use std::hint::black_box;
use std::path::PathBuf;
use tempfile::TempDir;
use ziplocal_core::ArchiveConfig;
use ziplocal_core::ArchiveModel;
use ziplocal_core::creation::TreeWalker;
use ziplocal_core::extraction::extract;
use ziplocal_core::extraction::extract_async;
use ziplocal_core::pack;
use ziplocal_core::unpack;

/// Creates `file_count` files of 1 KB spread over ten subdirectories.
fn create_test_directory(temp: &TempDir, file_count: usize) -> PathBuf {
    let dir = temp.path().join("bench_data");
    let content = "x".repeat(1024);
    for i in 0..file_count {
        let sub = dir.join(format!("sub_{}", i % 10));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("file_{i:05}.txt")), &content).unwrap();
    }
    dir
}

fn total_bytes(model: &ArchiveModel) -> u64 {
    model
        .files()
        .filter_map(|entry| entry.data())
        .map(|data| data.len() as u64)
        .sum()
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    for file_count in [10, 100, 500] {
        let temp = TempDir::new().unwrap();
        let dir = create_test_directory(&temp, file_count);

        group.throughput(Throughput::Elements(file_count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(file_count), &dir, |b, dir| {
            b.iter(|| black_box(TreeWalker::new(dir).walk().unwrap()));
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    let temp = TempDir::new().unwrap();
    let dir = create_test_directory(&temp, 200);
    let config = ArchiveConfig::default();
    let handle = pack(dir.as_path(), &config).unwrap();
    group.throughput(Throughput::Bytes(total_bytes(handle.model())));

    group.bench_function("stored", |b| {
        b.iter(|| black_box(handle.memory().unwrap()));
    });

    let compressed = handle.clone().compress();
    group.bench_function("deflated", |b| {
        b.iter(|| black_box(compressed.memory().unwrap()));
    });

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let temp = TempDir::new().unwrap();
    let dir = create_test_directory(&temp, 200);
    let config = ArchiveConfig::default();
    let bytes = pack(dir.as_path(), &config)
        .unwrap()
        .memory()
        .unwrap()
        .into_archive()
        .unwrap();
    let model = unpack(bytes, &config).unwrap().into_model();
    group.throughput(Throughput::Bytes(total_bytes(&model)));

    group.bench_function("blocking", |b| {
        b.iter_batched(
            || TempDir::new().unwrap(),
            |out| black_box(extract(&model, out.path()).unwrap()),
            BatchSize::SmallInput,
        );
    });

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime");
    for max_concurrent in [1, 16] {
        group.bench_with_input(
            BenchmarkId::new("non_blocking", max_concurrent),
            &max_concurrent,
            |b, &max_concurrent| {
                b.iter_batched(
                    || TempDir::new().unwrap(),
                    |out| {
                        black_box(
                            runtime
                                .block_on(extract_async(&model, out.path(), max_concurrent))
                                .unwrap(),
                        )
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_double_extract(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();

    let mut model = ArchiveModel::new();
    for i in 0..100 {
        model.insert_file(format!("a/b/c/file_{i}.txt"), "content");
    }
    extract(&model, &out).unwrap();

    c.bench_function("extract_into_existing_tree", |b| {
        b.iter(|| black_box(extract(&model, &out).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_walk,
    bench_serialize,
    bench_extract,
    bench_double_extract
);
criterion_main!(benches);
