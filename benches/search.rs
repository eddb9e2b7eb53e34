//! Query benchmarks: FM-index backward search against the scanners
//!
//! Run with: cargo bench --bench search

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fmgrep::index::{FmIndex, IndexConfig};
use fmgrep::scan::{BoyerMoore, Kmp, Matcher, RabinKarp};

fn sample_text() -> Vec<u8> {
    b"tres tristes tigres comen trigo en un trigal. ".repeat(20_000)
}

fn bench_scanners_vs_index(c: &mut Criterion) {
    let text = sample_text();
    let index = FmIndex::build(&text).expect("Failed to build index");
    let patterns: [&[u8]; 4] = [b"tr", b"tigres", b"trigal. tres", b"absent pattern"];
    let scanners: [&dyn Matcher; 3] = [&Kmp, &BoyerMoore, &RabinKarp];

    let mut group = c.benchmark_group("search");
    for pattern in patterns {
        let label = String::from_utf8_lossy(pattern).into_owned();

        group.bench_with_input(BenchmarkId::new("fm-index", &label), &pattern, |b, p| {
            b.iter(|| index.search(black_box(p)))
        });
        for scanner in scanners {
            group.bench_with_input(BenchmarkId::new(scanner.name(), &label), &pattern, |b, p| {
                b.iter(|| scanner.find_all(black_box(&text), black_box(p)))
            });
        }
    }
    group.finish();
}

fn bench_checkpoint_interval(c: &mut Criterion) {
    let text = sample_text();
    let mut group = c.benchmark_group("count_by_interval");

    for interval in [1usize, 16, 64, 256] {
        let config = IndexConfig {
            checkpoint_interval: interval,
            ..Default::default()
        };
        let index = FmIndex::with_config(&text, &config).expect("Failed to build index");
        group.bench_function(BenchmarkId::from_parameter(interval), |b| {
            b.iter(|| index.count(black_box(b"trigal")))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scanners_vs_index, bench_checkpoint_interval);
criterion_main!(benches);
