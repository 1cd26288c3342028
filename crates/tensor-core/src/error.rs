// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor construction and evaluation.

use crate::Extents;

/// Errors that can occur while building or evaluating a tensor graph.
///
/// Shape problems surface at view construction time, never at access time,
/// so an invalid graph cannot be built in the first place.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TensorError {
    /// Children of a view disagree on the extents the operation requires.
    #[error("shape mismatch in {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Extents,
        rhs: Extents,
    },

    /// A coordinate access exceeded the tensor's declared extents.
    #[error("coordinate ({row}, {col}, {channel}) out of range for extents {extents}")]
    OutOfRange {
        row: usize,
        col: usize,
        channel: usize,
        extents: Extents,
    },

    /// Gauss-Jordan elimination found a column with no usable pivot.
    #[error("matrix is not invertible: no non-zero pivot in column {column} (channel {channel})")]
    NotInvertible { column: usize, channel: usize },

    /// A deliberately unfinished operation was invoked.
    #[error("{op} is not implemented")]
    NotImplemented { op: &'static str },
}
