//! Benchmarks for spark-breakpoints
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spark_breakpoints::{
    effect, signal, BreakpointResolver, Pairing, SortedThresholds, ThresholdSet,
};

fn grid(count: usize) -> ThresholdSet {
    ThresholdSet::from_pairs((0..count).map(|i| (format!("bp{i}"), (i as f64 + 1.0) * 64.0)))
        .unwrap()
}

// =============================================================================
// NORMALIZATION
// =============================================================================

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for count in [4, 16, 64] {
        let set = grid(count);
        for pairing in [Pairing::Positional, Pairing::ByName] {
            group.bench_with_input(
                BenchmarkId::new(format!("{pairing:?}"), count),
                &set,
                |b, set| b.iter(|| black_box(SortedThresholds::normalize(set, pairing))),
            );
        }
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let sorted = SortedThresholds::normalize(&grid(64), Pairing::default());
    c.bench_function("resolve_width", |b| {
        let mut width = 0.0;
        b.iter(|| {
            width = (width + 37.0) % 4200.0;
            black_box(sorted.resolve(black_box(width)))
        })
    });
}

// =============================================================================
// RESOLVER
// =============================================================================

fn bench_resolver_create(c: &mut Criterion) {
    let set = grid(4);
    let width = signal(800.0);
    c.bench_function("resolver_create", |b| {
        b.iter(|| black_box(BreakpointResolver::new(&set, &width)))
    });
}

fn bench_width_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("width_sweep");
    for count in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::new("breakpoints", count), &count, |b, &count| {
            let width = signal(0.0);
            let resolver = BreakpointResolver::new(&grid(count), &width);
            let _observer = effect({
                let breakpoint = resolver.breakpoint().clone();
                move || {
                    black_box(breakpoint.get());
                }
            });

            let mut w = 0.0;
            b.iter(|| {
                w = (w + 13.0) % 4200.0;
                width.set(w);
            })
        });
    }
    group.finish();
}

fn bench_width_within_step(c: &mut Criterion) {
    let width = signal(800.0);
    let resolver = BreakpointResolver::new(&grid(16), &width);
    let _observer = effect({
        let breakpoint = resolver.breakpoint().clone();
        move || {
            black_box(breakpoint.get());
        }
    });

    c.bench_function("width_within_step", |b| {
        let mut toggle = false;
        b.iter(|| {
            toggle = !toggle;
            width.set(if toggle { 801.0 } else { 802.0 })
        })
    });
}

criterion_group!(threshold_benches, bench_normalize, bench_resolve);

criterion_group!(
    resolver_benches,
    bench_resolver_create,
    bench_width_sweep,
    bench_width_within_step,
);

criterion_main!(threshold_benches, resolver_benches);
