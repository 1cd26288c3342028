// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The tensor read contract shared by every leaf and view.

use crate::{DenseTensor, Extents, TensorError};
use std::sync::Arc;

/// Shared handle to a node in a tensor expression graph.
///
/// Views hold `TensorRef`s to their children, so the same sub-expression
/// may appear in several branches of a graph. The graph is a DAG of
/// shared owners: a child lives as long as its longest-lived holder and
/// is evaluated identically from every branch.
pub type TensorRef = Arc<dyn Tensor>;

/// Read access to a 3-dimensional (row × column × channel) array of `f32`.
///
/// Implementors fall into two kinds:
/// - *Leaf tensors* own their values ([`DenseTensor`] and friends).
/// - *Views* own no data and compute each coordinate on demand from one,
///   two, or three child tensors.
///
/// Both kinds answer the same contract, so a materialized tensor can stand
/// in for any view and vice versa. Coordinate reads are referentially
/// transparent: the same coordinate on the same graph always yields the
/// same value.
pub trait Tensor: Send + Sync {
    /// Returns the row count.
    fn rows(&self) -> usize;

    /// Returns the column count.
    fn cols(&self) -> usize;

    /// Returns the channel count.
    fn channels(&self) -> usize;

    /// Raw coordinate read.
    ///
    /// Callers must keep every coordinate below the corresponding extent;
    /// views rely on this after their construction-time shape checks and
    /// do not re-validate per access. Use [`get`](Tensor::get) at the
    /// graph boundary when coordinates come from untrusted arithmetic.
    fn value(&self, row: usize, col: usize, channel: usize) -> f32;

    /// Whether independent coordinates of this node may be evaluated
    /// concurrently. Row-flattening is the one view that answers `false`,
    /// because its output ordering is defined by sequential row-major
    /// traversal of the child.
    fn parallel_safe(&self) -> bool {
        true
    }

    /// Returns all three extents as one descriptor.
    fn extents(&self) -> Extents {
        Extents::new(self.rows(), self.cols(), self.channels())
    }

    /// Returns the total number of elements.
    fn size(&self) -> usize {
        self.rows() * self.cols() * self.channels()
    }

    /// Bounds-checked coordinate read.
    ///
    /// # Errors
    /// Returns [`TensorError::OutOfRange`] if any coordinate exceeds the
    /// corresponding extent.
    fn get(&self, row: usize, col: usize, channel: usize) -> Result<f32, TensorError> {
        let extents = self.extents();
        if !extents.contains(row, col, channel) {
            return Err(TensorError::OutOfRange {
                row,
                col,
                channel,
                extents,
            });
        }
        Ok(self.value(row, col, channel))
    }

    /// Sums every element, evaluating the graph below this node.
    fn sum(&self) -> f32 {
        let mut total = 0.0;
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                for channel in 0..self.channels() {
                    total += self.value(row, col, channel);
                }
            }
        }
        total
    }

    /// Arithmetic mean over every element, or 0.0 for an empty tensor.
    fn arithmetic_mean(&self) -> f32 {
        let n = self.size();
        if n == 0 {
            0.0
        } else {
            self.sum() / n as f32
        }
    }
}

/// Evaluates every coordinate of `tensor` and stores the result.
///
/// Materialization is the escape hatch from lazy evaluation: use it when a
/// value will be read many times (moment tensors in an optimizer, a reused
/// activation) so the view graph below it is collapsed once instead of
/// re-walked per read.
///
/// Rows are evaluated in parallel when every node in the graph reports
/// [`Tensor::parallel_safe`]; a graph containing a row-flatten falls back
/// to the serial path.
pub fn materialize(tensor: &dyn Tensor) -> DenseTensor {
    let extents = tensor.extents();
    tracing::debug!("materializing {extents} tensor");

    let values = if tensor.parallel_safe() && extents.rows() > 1 {
        materialize_rows_parallel(tensor, extents)
    } else {
        materialize_rows_serial(tensor, extents)
    };

    DenseTensor::from_raw(extents, values)
}

fn materialize_rows_serial(tensor: &dyn Tensor, extents: Extents) -> Vec<f32> {
    let mut values = Vec::with_capacity(extents.size());
    for row in 0..extents.rows() {
        evaluate_row(tensor, extents, row, &mut values);
    }
    values
}

fn materialize_rows_parallel(tensor: &dyn Tensor, extents: Extents) -> Vec<f32> {
    use rayon::prelude::*;

    (0..extents.rows())
        .into_par_iter()
        .flat_map_iter(|row| {
            let mut row_values = Vec::with_capacity(extents.cols() * extents.channels());
            evaluate_row(tensor, extents, row, &mut row_values);
            row_values
        })
        .collect()
}

fn evaluate_row(tensor: &dyn Tensor, extents: Extents, row: usize, out: &mut Vec<f32>) {
    for col in 0..extents.cols() {
        for channel in 0..extents.channels() {
            out.push(tensor.value(row, col, channel));
        }
    }
}
