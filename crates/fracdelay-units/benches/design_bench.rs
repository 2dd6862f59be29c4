// SPDX-License-Identifier: LGPL-3.0-or-later

//! Criterion benchmarks for tap synthesis, correction and the design
//! pipeline.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fracdelay_units::DesignConfig;
use fracdelay_units::corrector::{DelayCorrector, correct_channels};
use fracdelay_units::design::design;
use fracdelay_units::interpolation::lagrange_taps;
use fracdelay_units::response::{NyquistPolicy, frequency_response, log_sweep};
use std::f64::consts::PI;

const BUF_SIZE: usize = 4096;

fn bench_synthesis(c: &mut Criterion) {
    let mut group = c.benchmark_group("lagrange_taps");
    for &order in &[3usize, 4, 6, 12] {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter(|| lagrange_taps(black_box(order), black_box(0.0924)));
        });
    }
    group.finish();
}

fn bench_correct_channels(c: &mut Criterion) {
    let correctors: Vec<DelayCorrector> = (0..20)
        .map(|ch| DelayCorrector::new(6, (ch % 8) as f64 * 0.0132))
        .collect::<Result<_, _>>()
        .unwrap();
    let channels: Vec<Vec<f64>> = (0..20)
        .map(|ch| {
            (0..BUF_SIZE)
                .map(|i| (2.0 * PI * (i + ch) as f64 / 40.0).sin())
                .collect()
        })
        .collect();

    c.bench_function("correct_20_channels", |b| {
        b.iter(|| correct_channels(black_box(&correctors), black_box(&channels)));
    });
}

fn bench_response(c: &mut Criterion) {
    let taps = lagrange_taps(6, 0.0924).unwrap();
    let sweep = log_sweep(40e3, 1e-4, 1000).unwrap();
    c.bench_function("frequency_response_1000", |b| {
        b.iter(|| {
            frequency_response(
                black_box(&taps),
                40e3,
                black_box(&sweep),
                NyquistPolicy::Reject,
            )
        });
    });
}

fn bench_design(c: &mut Criterion) {
    let config = DesignConfig::default();
    c.bench_function("design_reference_board", |b| {
        b.iter(|| design(black_box(&config)));
    });
}

criterion_group!(
    benches,
    bench_synthesis,
    bench_correct_channels,
    bench_response,
    bench_design
);
criterion_main!(benches);
