//! Aggregation Benchmarks — Per-Round Hot Path
//!
//! Benchmarks parsing source payload values and the median reduction.
//!
//! Run with: cargo bench --bench median_bench

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use price_feeder::domain::median::reduce;
use price_feeder::domain::price::Price;

/// Benchmark parsing a string price.
fn bench_parse_string(c: &mut Criterion) {
    let value = json!("0.0123456789");

    c.bench_function("price_from_json_string", |b| {
        b.iter(|| Price::from_json(black_box(&value)));
    });
}

/// Benchmark parsing a float price.
fn bench_parse_number(c: &mut Criterion) {
    let value = json!(0.012_345_678_9);

    c.bench_function("price_from_json_number", |b| {
        b.iter(|| Price::from_json(black_box(&value)));
    });
}

/// Benchmark the median of a typical source count.
fn bench_reduce(c: &mut Criterion) {
    let prices: Vec<Price> = [131, 118, 125, 122, 140, 119, 127]
        .into_iter()
        .map(|v| Price::from_mini_dollars(v * 1_000_000))
        .collect();

    c.bench_function("median_reduce_7", |b| {
        b.iter(|| reduce(black_box(&prices)));
    });
}

criterion_group!(benches, bench_parse_string, bench_parse_number, bench_reduce);
criterion_main!(benches);
