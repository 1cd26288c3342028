// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Constructor functions for every view in the algebra.
//!
//! Each function wraps its operand handles (cloning the `Arc`s, never the
//! data) and returns a new [`TensorRef`]. Operations whose shape rules can
//! be violated return `Result`; purely shape-preserving unary wraps are
//! infallible.

use crate::compose::{MaskedSelect, PointwiseBinary, PointwiseUnary};
use crate::correlate::CrossCorrelation;
use crate::linalg::MatrixDivide;
use crate::structural::{ChannelSelect, Rotate180, RowFlatten, Transpose, ZeroPad};
use std::sync::Arc;
use tensor_core::{TensorError, TensorRef};

/// Divisors get this added before dividing, so an exact zero on the right
/// never produces an infinity.
pub const DIV_EPSILON: f32 = 1e-7;

// ── Elementwise binary ─────────────────────────────────────────

/// Elementwise `lhs + rhs`.
pub fn add(lhs: &TensorRef, rhs: &TensorRef) -> Result<TensorRef, TensorError> {
    Ok(Arc::new(PointwiseBinary::new(
        "add",
        Arc::clone(lhs),
        Arc::clone(rhs),
        |a, b| a + b,
    )?))
}

/// Elementwise `lhs − rhs`.
pub fn sub(lhs: &TensorRef, rhs: &TensorRef) -> Result<TensorRef, TensorError> {
    Ok(Arc::new(PointwiseBinary::new(
        "subtract",
        Arc::clone(lhs),
        Arc::clone(rhs),
        |a, b| a - b,
    )?))
}

/// Elementwise `lhs × rhs`.
pub fn mul(lhs: &TensorRef, rhs: &TensorRef) -> Result<TensorRef, TensorError> {
    Ok(Arc::new(PointwiseBinary::new(
        "multiply",
        Arc::clone(lhs),
        Arc::clone(rhs),
        |a, b| a * b,
    )?))
}

/// Elementwise `lhs / (rhs + ε)` with [`DIV_EPSILON`] guarding the divisor.
pub fn div(lhs: &TensorRef, rhs: &TensorRef) -> Result<TensorRef, TensorError> {
    Ok(Arc::new(PointwiseBinary::new(
        "divide",
        Arc::clone(lhs),
        Arc::clone(rhs),
        |a, b| a / (b + DIV_EPSILON),
    )?))
}

// ── Elementwise unary ──────────────────────────────────────────

/// Adds a scalar to every element.
pub fn add_scalar(tensor: &TensorRef, scalar: f32) -> TensorRef {
    Arc::new(PointwiseUnary::new(Arc::clone(tensor), move |x| x + scalar))
}

/// Multiplies every element by a scalar.
pub fn mul_scalar(tensor: &TensorRef, scalar: f32) -> TensorRef {
    Arc::new(PointwiseUnary::new(Arc::clone(tensor), move |x| x * scalar))
}

/// Raises every element to `exponent`.
pub fn power(tensor: &TensorRef, exponent: f32) -> TensorRef {
    Arc::new(PointwiseUnary::new(Arc::clone(tensor), move |x| {
        x.powf(exponent)
    }))
}

/// Absolute value of every element.
pub fn abs(tensor: &TensorRef) -> TensorRef {
    Arc::new(PointwiseUnary::new(Arc::clone(tensor), f32::abs))
}

/// Square root of every element.
pub fn sqrt(tensor: &TensorRef) -> TensorRef {
    Arc::new(PointwiseUnary::new(Arc::clone(tensor), f32::sqrt))
}

/// Clamps every element to `[min, max]`.
pub fn clip(tensor: &TensorRef, min: f32, max: f32) -> TensorRef {
    Arc::new(PointwiseUnary::new(Arc::clone(tensor), move |x| {
        x.clamp(min, max)
    }))
}

/// Elementwise `1 / (x + ε)` with a caller-chosen epsilon.
pub fn inverse(tensor: &TensorRef, epsilon: f32) -> TensorRef {
    Arc::new(PointwiseUnary::new(Arc::clone(tensor), move |x| {
        1.0 / (x + epsilon)
    }))
}

/// 0/1 mask: 1.0 where the element is strictly below `threshold`.
pub fn less_than(tensor: &TensorRef, threshold: f32) -> TensorRef {
    Arc::new(PointwiseUnary::new(Arc::clone(tensor), move |x| {
        if x < threshold {
            1.0
        } else {
            0.0
        }
    }))
}

// ── Trinary ────────────────────────────────────────────────────

/// Per-coordinate select: `on_true` where `mask > 0`, else `on_false`.
pub fn masked_select(
    mask: &TensorRef,
    on_true: &TensorRef,
    on_false: &TensorRef,
) -> Result<TensorRef, TensorError> {
    Ok(Arc::new(MaskedSelect::new(
        Arc::clone(mask),
        Arc::clone(on_true),
        Arc::clone(on_false),
    )?))
}

// ── Structural ─────────────────────────────────────────────────

/// Swaps rows and columns.
pub fn transpose(tensor: &TensorRef) -> TensorRef {
    Arc::new(Transpose::new(Arc::clone(tensor)))
}

/// Reflects rows and columns about the center.
pub fn rotate180(tensor: &TensorRef) -> TensorRef {
    Arc::new(Rotate180::new(Arc::clone(tensor)))
}

/// Surrounds the tensor with a zero border.
pub fn zero_pad(
    tensor: &TensorRef,
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
) -> TensorRef {
    Arc::new(ZeroPad::new(Arc::clone(tensor), top, bottom, left, right))
}

/// Reinterprets the tensor as a single row in element order.
pub fn row_flatten(tensor: &TensorRef) -> TensorRef {
    Arc::new(RowFlatten::new(Arc::clone(tensor)))
}

/// Extracts one channel as a single-channel tensor.
pub fn channel_select(tensor: &TensorRef, channel: usize) -> Result<TensorRef, TensorError> {
    Ok(Arc::new(ChannelSelect::new(Arc::clone(tensor), channel)?))
}

// ── Correlation / convolution ──────────────────────────────────

/// Valid 2D cross-correlation of `input` by `kernel`.
pub fn correlate_valid(input: &TensorRef, kernel: &TensorRef) -> Result<TensorRef, TensorError> {
    Ok(Arc::new(CrossCorrelation::new(
        Arc::clone(input),
        Arc::clone(kernel),
    )?))
}

/// Full 2D cross-correlation: valid correlation over a zero-padded input.
pub fn correlate_full(input: &TensorRef, kernel: &TensorRef) -> Result<TensorRef, TensorError> {
    Ok(Arc::new(CrossCorrelation::full(
        Arc::clone(input),
        Arc::clone(kernel),
    )?))
}

/// Valid convolution: cross-correlation with the kernel rotated 180°.
pub fn convolve_valid(input: &TensorRef, kernel: &TensorRef) -> Result<TensorRef, TensorError> {
    correlate_valid(input, &rotate180(kernel))
}

/// Full convolution: full cross-correlation with the kernel rotated 180°.
pub fn convolve_full(input: &TensorRef, kernel: &TensorRef) -> Result<TensorRef, TensorError> {
    correlate_full(input, &rotate180(kernel))
}

// ── Matrix division ────────────────────────────────────────────

/// Divides `lhs` by `rhs` through per-channel inversion and row-wise
/// element-product sums. See [`MatrixDivide`] for the exact (non-standard)
/// semantics.
pub fn matrix_divide(lhs: &TensorRef, rhs: &TensorRef) -> Result<TensorRef, TensorError> {
    Ok(Arc::new(MatrixDivide::new(
        Arc::clone(lhs),
        Arc::clone(rhs),
    )?))
}
