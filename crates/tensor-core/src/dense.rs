// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The materialized (buffer-owning) tensor.

use crate::{Extents, Tensor, TensorError};

/// An owned tensor stored as a contiguous `f32` buffer.
///
/// Values are laid out in the flat order of [`Extents::flat_index`]:
/// rows outermost, then columns, then channels. A `DenseTensor` is mutable
/// only through its constructors; once handed to a graph it is read-only
/// like every other [`Tensor`].
#[derive(Debug, Clone, PartialEq)]
pub struct DenseTensor {
    extents: Extents,
    values: Vec<f32>,
}

impl DenseTensor {
    /// Creates a tensor filled with zeros.
    pub fn zeros(extents: Extents) -> Self {
        Self {
            extents,
            values: vec![0.0; extents.size()],
        }
    }

    /// Creates a tensor from a flat value buffer in row-major order.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] if the buffer length does not
    /// equal `extents.size()`.
    pub fn from_values(extents: Extents, values: Vec<f32>) -> Result<Self, TensorError> {
        if values.len() != extents.size() {
            return Err(TensorError::ShapeMismatch {
                op: "dense construction",
                lhs: extents,
                rhs: Extents::row(values.len()),
            });
        }
        Ok(Self { extents, values })
    }

    /// Creates a single-channel matrix from nested rows.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] if the rows have uneven lengths.
    pub fn from_rows(rows: &[&[f32]]) -> Result<Self, TensorError> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, |r| r.len());
        let mut values = Vec::with_capacity(row_count * col_count);
        for row in rows {
            if row.len() != col_count {
                return Err(TensorError::ShapeMismatch {
                    op: "dense construction",
                    lhs: Extents::row(col_count),
                    rhs: Extents::row(row.len()),
                });
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            extents: Extents::matrix(row_count, col_count),
            values,
        })
    }

    /// Creates a tensor from parts already known to be consistent.
    /// Used by materialization, which derives the buffer from the extents.
    pub(crate) fn from_raw(extents: Extents, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), extents.size());
        Self { extents, values }
    }

    /// Returns the flat value buffer in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

impl Tensor for DenseTensor {
    fn rows(&self) -> usize {
        self.extents.rows()
    }

    fn cols(&self) -> usize {
        self.extents.cols()
    }

    fn channels(&self) -> usize {
        self.extents.channels()
    }

    fn value(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.values[self.extents.flat_index(row, col, channel)]
    }
}
