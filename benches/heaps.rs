#![allow(unused)]
extern crate cilheaps;

use cilheaps::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

/// Identifier-like names with a realistic share of repeats
fn sample_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("Namespace{}.Type{}", i % 17, i % 1024))
        .collect()
}

/// Benchmark inserting identifiers into the #Strings heap and serializing it
fn bench_strings(c: &mut Criterion) {
    let names = sample_names(10_000);
    let total: usize = names.iter().map(String::len).sum();

    let mut group = c.benchmark_group("strings_heap");
    group.throughput(Throughput::Bytes(total as u64));
    group.bench_function("add", |b| {
        b.iter(|| {
            let mut strings = StringHeap::new();
            for name in &names {
                black_box(strings.add_str(name).unwrap());
            }
            black_box(strings)
        });
    });
    group.bench_function("add_and_write", |b| {
        b.iter(|| {
            let mut strings = StringHeap::new();
            for name in &names {
                strings.add_str(name).unwrap();
            }
            black_box(strings.to_bytes().unwrap())
        });
    });
    group.finish();
}

/// Benchmark inserting literals into the #US heap and serializing it
fn bench_userstrings(c: &mut Criterion) {
    let literals = sample_names(10_000);

    let mut group = c.benchmark_group("userstring_heap");
    group.bench_function("add_and_write", |b| {
        b.iter(|| {
            let mut userstrings = UserStringHeap::new();
            for literal in &literals {
                userstrings.add_str(literal).unwrap();
            }
            black_box(userstrings.to_bytes().unwrap())
        });
    });
    group.finish();
}

/// Benchmark inserting signature-sized blobs into the #Blob heap
fn bench_blobs(c: &mut Criterion) {
    let blobs: Vec<Vec<u8>> = (0..10_000u32)
        .map(|i| {
            let len = (i % 200) as usize + 1;
            vec![(i % 13) as u8; len]
        })
        .collect();

    let mut group = c.benchmark_group("blob_heap");
    group.bench_function("add_and_write", |b| {
        b.iter(|| {
            let mut heap = BlobHeap::new();
            for blob in &blobs {
                heap.add(blob).unwrap();
            }
            black_box(heap.to_bytes().unwrap())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_strings, bench_userstrings, bench_blobs);
criterion_main!(benches);
