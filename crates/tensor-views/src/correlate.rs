// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! 2D cross-correlation views.
//!
//! Only "valid" correlation is a primitive; "full" correlation is valid
//! correlation over a zero-padded input, and convolution (see
//! [`crate::ops::convolve_valid`]) is correlation with a 180°-rotated
//! kernel. The engine leans on these identities instead of implementing
//! each variant directly.

use crate::structural::ZeroPad;
use std::sync::Arc;
use tensor_core::{Extents, Tensor, TensorError, TensorRef};

/// Valid 2D cross-correlation of an input by a kernel.
///
/// Output extents are `input − kernel + 1` per row/column dimension and the
/// input's channel count. Each output coordinate is the kernel-window
/// weighted sum
///
/// ```text
/// out(r, c, ch) = Σ_{kr, kc} kernel(kr, kc, 0) · input(r + kr, c + kc, ch)
/// ```
///
/// The kernel's channel 0 is reused for every output channel; the kernel
/// is not per-channel.
pub struct CrossCorrelation {
    input: TensorRef,
    kernel: TensorRef,
    out_rows: usize,
    out_cols: usize,
}

impl CrossCorrelation {
    /// Builds a valid cross-correlation view.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] if the kernel extends beyond
    /// the input in rows or columns, or if either operand has no channels.
    pub fn new(input: TensorRef, kernel: TensorRef) -> Result<Self, TensorError> {
        if kernel.rows() > input.rows()
            || kernel.cols() > input.cols()
            || kernel.channels() == 0
            || input.channels() == 0
        {
            return Err(TensorError::ShapeMismatch {
                op: "cross-correlation",
                lhs: input.extents(),
                rhs: kernel.extents(),
            });
        }
        let out_rows = input.rows() - kernel.rows() + 1;
        let out_cols = input.cols() - kernel.cols() + 1;
        Ok(Self {
            input,
            kernel,
            out_rows,
            out_cols,
        })
    }

    /// Builds a full cross-correlation view: valid correlation over a
    /// zero-padded input.
    ///
    /// The padding per side is `round(kernel_extent / 2)` when the kernel
    /// extent exceeds 1 in that dimension, else 0. The asymmetric rounding
    /// is deliberate — it keeps even-sized kernels usable.
    pub fn full(input: TensorRef, kernel: TensorRef) -> Result<Self, TensorError> {
        let pad_rows = full_padding(kernel.rows());
        let pad_cols = full_padding(kernel.cols());
        let padded: TensorRef = Arc::new(ZeroPad::new(input, pad_rows, pad_rows, pad_cols, pad_cols));
        Self::new(padded, kernel)
    }

    /// The extents this view produces.
    pub fn output_extents(&self) -> Extents {
        Extents::new(self.out_rows, self.out_cols, self.input.channels())
    }
}

/// Padding per side for the full variant.
fn full_padding(kernel_extent: usize) -> usize {
    if kernel_extent > 1 {
        (kernel_extent as f32 / 2.0).round() as usize
    } else {
        0
    }
}

impl Tensor for CrossCorrelation {
    fn rows(&self) -> usize {
        self.out_rows
    }

    fn cols(&self) -> usize {
        self.out_cols
    }

    fn channels(&self) -> usize {
        self.input.channels()
    }

    fn value(&self, row: usize, col: usize, channel: usize) -> f32 {
        let mut acc = 0.0;
        for kr in 0..self.kernel.rows() {
            for kc in 0..self.kernel.cols() {
                acc += self.kernel.value(kr, kc, 0)
                    * self.input.value(row + kr, col + kc, channel);
            }
        }
        acc
    }

    fn parallel_safe(&self) -> bool {
        self.input.parallel_safe() && self.kernel.parallel_safe()
    }
}
