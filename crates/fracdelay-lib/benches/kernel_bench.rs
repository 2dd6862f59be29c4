// SPDX-License-Identifier: LGPL-3.0-or-later

//! Criterion benchmarks for the convolution and response kernels.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fracdelay_lib::complex::{complex_arg_deg, complex_mag_db, fir_response};
use fracdelay_lib::convolution::convolve_valid;
use fracdelay_lib::grid::logspace;
use fracdelay_lib::phase::unwrap_deg;
use std::f64::consts::PI;

const BUF_SIZE: usize = 4096;

fn tone(len: usize) -> Vec<f64> {
    (0..len).map(|i| (2.0 * PI * i as f64 / 8.0).sin()).collect()
}

fn bench_convolve_valid(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve_valid");
    let input = tone(BUF_SIZE);

    for &taps in &[3usize, 4, 6, 12] {
        let kernel = vec![1.0 / taps as f64; taps];
        let mut output = vec![0.0; BUF_SIZE];
        group.bench_with_input(BenchmarkId::from_parameter(taps), &taps, |b, _| {
            b.iter(|| {
                convolve_valid(black_box(&mut output), black_box(&input), black_box(&kernel));
            });
        });
    }

    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let kernel = [-0.0625, 0.5625, 0.5625, -0.0625];
    let omegas: Vec<f64> = logspace(-4.0, 0.5f64.log10(), 1000, true)
        .into_iter()
        .map(|f| 2.0 * PI * f)
        .collect();
    let mut re = vec![0.0; omegas.len()];
    let mut im = vec![0.0; omegas.len()];
    let mut mag = vec![0.0; omegas.len()];
    let mut phase = vec![0.0; omegas.len()];

    c.bench_function("sweep_1000", |b| {
        b.iter(|| {
            fir_response(&mut re, &mut im, black_box(&kernel), black_box(&omegas));
            complex_mag_db(&mut mag, &re, &im);
            complex_arg_deg(&mut phase, &re, &im);
            unwrap_deg(&mut phase);
        });
    });
}

criterion_group!(benches, bench_convolve_valid, bench_sweep);
criterion_main!(benches);
