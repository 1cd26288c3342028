// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for view graph evaluation and materialization.

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use tensor_core::{materialize, Extents, FnTensor, TensorRef};
use tensor_views::ops;

fn ramp(rows: usize, cols: usize, channels: usize) -> TensorRef {
    Arc::new(FnTensor::new(
        Extents::new(rows, cols, channels),
        |r, c, ch| (r + c + ch) as f32,
    ))
}

fn bench_elementwise_chain(c: &mut Criterion) {
    let a = ramp(64, 64, 3);
    let b = ramp(64, 64, 3);
    let expr = ops::sqrt(&ops::abs(&ops::sub(&a, &b).unwrap()));

    c.bench_function("materialize_elementwise_64x64x3", |bencher| {
        bencher.iter(|| materialize(expr.as_ref()))
    });
}

fn bench_correlation(c: &mut Criterion) {
    let input = ramp(64, 64, 1);
    let kernel = ramp(5, 5, 1);
    let expr = ops::correlate_valid(&input, &kernel).unwrap();

    c.bench_function("materialize_correlation_64x64_5x5", |bencher| {
        bencher.iter(|| materialize(expr.as_ref()))
    });
}

criterion_group!(benches, bench_elementwise_chain, bench_correlation);
criterion_main!(benches);
