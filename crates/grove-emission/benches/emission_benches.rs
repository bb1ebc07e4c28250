//! Criterion benchmarks for grove-emission critical operations.
//!
//! Covers: single-cycle multiplier, deep multi-cycle multiplier, and the
//! per-cycle rate computation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use grove_core::constants::{BASE_RATE_PER_BLOCK, CYCLE_LENGTH};
use grove_core::traits::EmissionCurve;
use grove_emission::EmissionSchedule;

fn mainnet() -> EmissionSchedule {
    EmissionSchedule::new(1_000, BASE_RATE_PER_BLOCK, 6, 3, 95, CYCLE_LENGTH).unwrap()
}

fn bench_multiplier_within_cycle(c: &mut Criterion) {
    let s = mainnet();

    c.bench_function("multiplier_within_cycle", |b| {
        b.iter(|| s.multiplier(black_box(1_000), black_box(1_000 + 10_000)))
    });
}

fn bench_multiplier_hundred_cycles(c: &mut Criterion) {
    let s = mainnet();
    let to = 1_000 + 100 * CYCLE_LENGTH;

    c.bench_function("multiplier_hundred_cycles", |b| {
        b.iter(|| s.multiplier(black_box(1_000), black_box(to)))
    });
}

fn bench_rate_for_deep_cycle(c: &mut Criterion) {
    let s = mainnet();

    c.bench_function("rate_for_cycle_deep", |b| {
        b.iter(|| s.rate_for_cycle(black_box(400)))
    });
}

fn bench_emitted(c: &mut Criterion) {
    let s = mainnet();

    c.bench_function("emitted_full_cycle", |b| {
        b.iter(|| s.emitted(black_box(1_000), black_box(1_000 + CYCLE_LENGTH)))
    });
}

criterion_group!(
    benches,
    bench_multiplier_within_cycle,
    bench_multiplier_hundred_cycles,
    bench_rate_for_deep_cycle,
    bench_emitted,
);
criterion_main!(benches);
