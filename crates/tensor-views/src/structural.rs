// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Shape-changing views: transpose, rotation, padding, flattening, and
//! channel selection.

use tensor_core::{Tensor, TensorError, TensorRef};

/// Swaps row and column extents and coordinate order.
///
/// `transpose(transpose(t))` reproduces `t` at every coordinate.
pub struct Transpose {
    child: TensorRef,
}

impl Transpose {
    /// Wraps `child` in a transposed view.
    pub fn new(child: TensorRef) -> Self {
        Self { child }
    }
}

impl Tensor for Transpose {
    fn rows(&self) -> usize {
        self.child.cols()
    }

    fn cols(&self) -> usize {
        self.child.rows()
    }

    fn channels(&self) -> usize {
        self.child.channels()
    }

    fn value(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.child.value(col, row, channel)
    }

    fn parallel_safe(&self) -> bool {
        self.child.parallel_safe()
    }
}

/// Reflects both row and column coordinates about the tensor's center.
///
/// This is the 180° rotation used to express convolution in terms of
/// cross-correlation. Double rotation is the identity.
pub struct Rotate180 {
    child: TensorRef,
}

impl Rotate180 {
    /// Wraps `child` in a rotated view.
    pub fn new(child: TensorRef) -> Self {
        Self { child }
    }
}

impl Tensor for Rotate180 {
    fn rows(&self) -> usize {
        self.child.rows()
    }

    fn cols(&self) -> usize {
        self.child.cols()
    }

    fn channels(&self) -> usize {
        self.child.channels()
    }

    fn value(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.child
            .value(self.child.rows() - 1 - row, self.child.cols() - 1 - col, channel)
    }

    fn parallel_safe(&self) -> bool {
        self.child.parallel_safe()
    }
}

/// Surrounds the child with a zero border of independently configurable
/// widths. Reads inside the border return 0.0; reads outside it pass
/// through to the child with the offsets subtracted.
pub struct ZeroPad {
    child: TensorRef,
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
}

impl ZeroPad {
    /// Wraps `child` with the given border widths.
    pub fn new(child: TensorRef, top: usize, bottom: usize, left: usize, right: usize) -> Self {
        Self {
            child,
            top,
            bottom,
            left,
            right,
        }
    }

    /// Symmetric padding on all four sides.
    pub fn uniform(child: TensorRef, border: usize) -> Self {
        Self::new(child, border, border, border, border)
    }
}

impl Tensor for ZeroPad {
    fn rows(&self) -> usize {
        self.top + self.child.rows() + self.bottom
    }

    fn cols(&self) -> usize {
        self.left + self.child.cols() + self.right
    }

    fn channels(&self) -> usize {
        self.child.channels()
    }

    fn value(&self, row: usize, col: usize, channel: usize) -> f32 {
        if row < self.top
            || row >= self.top + self.child.rows()
            || col < self.left
            || col >= self.left + self.child.cols()
        {
            0.0
        } else {
            self.child.value(row - self.top, col - self.left, channel)
        }
    }

    fn parallel_safe(&self) -> bool {
        self.child.parallel_safe()
    }
}

/// Reinterprets the child's full element space as a single row of
/// `size()` columns in one channel, in row-major element order.
///
/// Flattening is defined by sequential traversal of the child, so this is
/// the one view that opts out of parallel materialization.
pub struct RowFlatten {
    child: TensorRef,
}

impl RowFlatten {
    /// Wraps `child` in a flattened view.
    pub fn new(child: TensorRef) -> Self {
        Self { child }
    }
}

impl Tensor for RowFlatten {
    fn rows(&self) -> usize {
        1
    }

    fn cols(&self) -> usize {
        self.child.size()
    }

    fn channels(&self) -> usize {
        1
    }

    fn value(&self, _row: usize, col: usize, _channel: usize) -> f32 {
        let (r, c, ch) = self.child.extents().coordinate(col);
        self.child.value(r, c, ch)
    }

    fn parallel_safe(&self) -> bool {
        false
    }
}

/// Extracts one channel of the child as a single-channel tensor.
pub struct ChannelSelect {
    child: TensorRef,
    channel: usize,
}

impl ChannelSelect {
    /// Selects `channel` from `child`.
    ///
    /// # Errors
    /// Returns [`TensorError::OutOfRange`] if the channel does not exist —
    /// like every shape rule, this is checked at construction.
    pub fn new(child: TensorRef, channel: usize) -> Result<Self, TensorError> {
        if channel >= child.channels() {
            return Err(TensorError::OutOfRange {
                row: 0,
                col: 0,
                channel,
                extents: child.extents(),
            });
        }
        Ok(Self { child, channel })
    }
}

impl Tensor for ChannelSelect {
    fn rows(&self) -> usize {
        self.child.rows()
    }

    fn cols(&self) -> usize {
        self.child.cols()
    }

    fn channels(&self) -> usize {
        1
    }

    fn value(&self, row: usize, col: usize, _channel: usize) -> f32 {
        self.child.value(row, col, self.channel)
    }

    fn parallel_safe(&self) -> bool {
        self.child.parallel_safe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tensor_core::{DenseTensor, Extents, FnTensor};

    fn dense(rows: &[&[f32]]) -> TensorRef {
        Arc::new(DenseTensor::from_rows(rows).unwrap())
    }

    #[test]
    fn test_transpose() {
        let t = Transpose::new(dense(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]));
        assert_eq!(t.extents(), Extents::matrix(3, 2));
        assert_eq!(t.value(0, 1, 0), 4.0);
        assert_eq!(t.value(2, 0, 0), 3.0);
    }

    #[test]
    fn test_double_transpose_is_identity() {
        let original = dense(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let twice = Transpose::new(Arc::new(Transpose::new(Arc::clone(&original))));
        assert_eq!(twice.extents(), original.extents());
        for r in 0..2 {
            for c in 0..3 {
                assert_eq!(twice.value(r, c, 0), original.value(r, c, 0));
            }
        }
    }

    #[test]
    fn test_rotate180() {
        let t = Rotate180::new(dense(&[&[1.0, 2.0], &[3.0, 4.0]]));
        assert_eq!(t.value(0, 0, 0), 4.0);
        assert_eq!(t.value(0, 1, 0), 3.0);
        assert_eq!(t.value(1, 0, 0), 2.0);
        assert_eq!(t.value(1, 1, 0), 1.0);
    }

    #[test]
    fn test_zero_pad() {
        let t = ZeroPad::new(dense(&[&[5.0]]), 1, 2, 3, 4);
        assert_eq!(t.extents(), Extents::matrix(4, 8));
        assert_eq!(t.value(0, 0, 0), 0.0);
        assert_eq!(t.value(1, 3, 0), 5.0);
        assert_eq!(t.value(3, 7, 0), 0.0);
    }

    #[test]
    fn test_zero_pad_uniform() {
        let t = ZeroPad::uniform(dense(&[&[1.0, 2.0]]), 1);
        assert_eq!(t.extents(), Extents::matrix(3, 4));
        assert_eq!(t.value(1, 1, 0), 1.0);
        assert_eq!(t.value(1, 2, 0), 2.0);
    }

    #[test]
    fn test_row_flatten() {
        let t = RowFlatten::new(dense(&[&[1.0, 2.0], &[3.0, 4.0]]));
        assert_eq!(t.extents(), Extents::row(4));
        assert_eq!(t.value(0, 0, 0), 1.0);
        assert_eq!(t.value(0, 1, 0), 2.0);
        assert_eq!(t.value(0, 2, 0), 3.0);
        assert_eq!(t.value(0, 3, 0), 4.0);
        assert!(!t.parallel_safe());
    }

    #[test]
    fn test_row_flatten_multi_channel() {
        let child = Arc::new(FnTensor::new(Extents::new(1, 2, 2), |_, c, ch| {
            (c * 2 + ch) as f32
        }));
        let t = RowFlatten::new(child);
        // Channels are innermost in the flat order.
        assert_eq!(t.value(0, 0, 0), 0.0);
        assert_eq!(t.value(0, 1, 0), 1.0);
        assert_eq!(t.value(0, 2, 0), 2.0);
        assert_eq!(t.value(0, 3, 0), 3.0);
    }

    #[test]
    fn test_channel_select() {
        let child = Arc::new(FnTensor::new(Extents::new(2, 2, 3), |_, _, ch| ch as f32));
        let t = ChannelSelect::new(child, 2).unwrap();
        assert_eq!(t.channels(), 1);
        assert_eq!(t.value(1, 1, 0), 2.0);
    }

    #[test]
    fn test_channel_select_out_of_range() {
        let child = dense(&[&[1.0]]);
        let result = ChannelSelect::new(child, 1);
        assert!(matches!(
            result.err(),
            Some(TensorError::OutOfRange { channel: 1, .. })
        ));
    }
}
