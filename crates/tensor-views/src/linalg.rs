// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-channel matrix inversion and the matrix-divide view.

use crate::compose::require_same_extents;
use std::sync::Arc;
use tensor_core::{DenseTensor, Extents, Tensor, TensorError, TensorRef};

/// Inverts each channel of a square tensor via Gauss-Jordan elimination.
///
/// For every channel the augmented matrix `[A|I]` is built, rows are
/// swapped to avoid zero pivots, each pivot row is normalized, the pivot
/// column is eliminated from all other rows, and the right half is
/// extracted as the inverse. Inversion is eager — it produces a
/// [`DenseTensor`], not a view, since elimination is inherently a
/// whole-matrix pass.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] if the tensor is not square and
/// [`TensorError::NotInvertible`] when a column has no non-zero pivot
/// candidate.
pub fn invert(tensor: &dyn Tensor) -> Result<DenseTensor, TensorError> {
    let n = tensor.rows();
    if tensor.cols() != n {
        return Err(TensorError::ShapeMismatch {
            op: "matrix inversion",
            lhs: tensor.extents(),
            rhs: Extents::matrix(n, n),
        });
    }

    let extents = tensor.extents();
    tracing::debug!("inverting {extents} tensor channel by channel");
    let mut values = vec![0.0f32; extents.size()];

    for channel in 0..tensor.channels() {
        let inverse = invert_channel(tensor, n, channel)?;
        for row in 0..n {
            for col in 0..n {
                values[extents.flat_index(row, col, channel)] = inverse[row * n + col];
            }
        }
    }

    DenseTensor::from_values(extents, values)
}

/// Gauss-Jordan on one channel, returning the inverse in row-major order.
fn invert_channel(tensor: &dyn Tensor, n: usize, channel: usize) -> Result<Vec<f32>, TensorError> {
    // Augmented [A|I], 2n columns per row.
    let width = 2 * n;
    let mut aug = vec![0.0f32; n * width];
    for row in 0..n {
        for col in 0..n {
            aug[row * width + col] = tensor.value(row, col, channel);
        }
        aug[row * width + n + row] = 1.0;
    }

    for pivot in 0..n {
        // Find a row at or below the pivot with a non-zero entry.
        let source = (pivot..n)
            .find(|&r| aug[r * width + pivot] != 0.0)
            .ok_or(TensorError::NotInvertible {
                column: pivot,
                channel,
            })?;
        if source != pivot {
            for col in 0..width {
                aug.swap(pivot * width + col, source * width + col);
            }
        }

        // Normalize the pivot row.
        let pivot_value = aug[pivot * width + pivot];
        for col in 0..width {
            aug[pivot * width + col] /= pivot_value;
        }

        // Eliminate the pivot column from every other row.
        for row in 0..n {
            if row == pivot {
                continue;
            }
            let factor = aug[row * width + pivot];
            if factor == 0.0 {
                continue;
            }
            for col in 0..width {
                aug[row * width + col] -= factor * aug[pivot * width + col];
            }
        }
    }

    // Extract the right half.
    let mut inverse = vec![0.0f32; n * n];
    for row in 0..n {
        inverse[row * n..(row + 1) * n]
            .copy_from_slice(&aug[row * width + n..(row + 1) * width]);
    }
    Ok(inverse)
}

/// Combines a tensor with the inverse of another by summing element
/// products row-wise:
///
/// ```text
/// out(r, c, ch) = Σ_j lhs(r, j, ch) · inverse(rhs)(r, j, ch)
/// ```
///
/// This is NOT true matrix multiplication by the inverse — every column of
/// an output row carries the same row sum, consistent with the engine's
/// elementwise-first treatment of matrix division. Operands must agree on
/// all extents.
pub struct MatrixDivide {
    lhs: TensorRef,
    inverse: Arc<DenseTensor>,
}

impl MatrixDivide {
    /// Builds the divide view, inverting `rhs` eagerly.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] on extent disagreement or a
    /// non-square divisor, and [`TensorError::NotInvertible`] when the
    /// divisor cannot be inverted.
    pub fn new(lhs: TensorRef, rhs: TensorRef) -> Result<Self, TensorError> {
        require_same_extents("matrix divide", lhs.as_ref(), rhs.as_ref())?;
        let inverse = Arc::new(invert(rhs.as_ref())?);
        Ok(Self { lhs, inverse })
    }
}

impl Tensor for MatrixDivide {
    fn rows(&self) -> usize {
        self.lhs.rows()
    }

    fn cols(&self) -> usize {
        self.lhs.cols()
    }

    fn channels(&self) -> usize {
        self.lhs.channels()
    }

    fn value(&self, row: usize, _col: usize, channel: usize) -> f32 {
        let mut acc = 0.0;
        for j in 0..self.lhs.cols() {
            acc += self.lhs.value(row, j, channel) * self.inverse.value(row, j, channel);
        }
        acc
    }

    fn parallel_safe(&self) -> bool {
        self.lhs.parallel_safe()
    }
}
