use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use collimate::engine::{collimate, CollimateOptions};
use collimate::types::{RawValue, RowSet};

/// Synthetic mixed-type row set: an integer id, a low-cardinality category, a
/// float measure, and a date string.
fn mixed_rows(n: usize) -> RowSet {
    let categories = ["alpha", "beta", "gamma", "delta", "na"];
    let rows = (0..n)
        .map(|i| {
            vec![
                RawValue::Text(i.to_string()),
                RawValue::Text(categories[i % categories.len()].to_string()),
                RawValue::Text(format!("{}.5", i % 100)),
                RawValue::Text(format!("2020-{}-{}", 1 + i % 12, 1 + i % 28)),
            ]
        })
        .collect();
    RowSet::new(
        vec![
            "id".to_string(),
            "category".to_string(),
            "measure".to_string(),
            "day".to_string(),
        ],
        rows,
    )
}

fn bench_collimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("collimate");
    for &n in &[1_000usize, 10_000, 100_000] {
        let rows = mixed_rows(n);
        group.bench_with_input(BenchmarkId::new("mixed", n), &rows, |b, rows| {
            b.iter(|| collimate(black_box(rows), &CollimateOptions::default()));
        });
        let options = CollimateOptions {
            normalize_dates: true,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("mixed_normalize_dates", n), &rows, |b, rows| {
            b.iter(|| collimate(black_box(rows), &options));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_collimate);
criterion_main!(benches);
