// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Extent descriptors and flat-index arithmetic.

use std::fmt;

/// The three extents of a [`crate::Tensor`]: rows × columns × channels.
///
/// Extents are immutable once created and provide the coordinate
/// arithmetic shared by dense storage and flattening views: containment
/// checks, flat-buffer indexing, and the inverse coordinate lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Extents {
    rows: usize,
    cols: usize,
    channels: usize,
}

impl Extents {
    /// Creates a descriptor from all three extents.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Extents;
    /// let e = Extents::new(2, 3, 4);
    /// assert_eq!(e.size(), 24);
    /// assert_eq!(e.channels(), 4);
    /// ```
    pub fn new(rows: usize, cols: usize, channels: usize) -> Self {
        Self {
            rows,
            cols,
            channels,
        }
    }

    /// Creates single-channel matrix extents.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self::new(rows, cols, 1)
    }

    /// Creates single-row, single-channel extents.
    pub fn row(cols: usize) -> Self {
        Self::new(1, cols, 1)
    }

    /// Returns the row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the channel count.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the total number of elements.
    pub fn size(&self) -> usize {
        self.rows * self.cols * self.channels
    }

    /// Returns `true` if the coordinate lies within every extent.
    pub fn contains(&self, row: usize, col: usize, channel: usize) -> bool {
        row < self.rows && col < self.cols && channel < self.channels
    }

    /// Maps a coordinate to its position in a flat buffer.
    ///
    /// Elements are ordered rows outermost, then columns, then channels.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Extents;
    /// let e = Extents::new(2, 3, 2);
    /// assert_eq!(e.flat_index(0, 0, 0), 0);
    /// assert_eq!(e.flat_index(0, 0, 1), 1);
    /// assert_eq!(e.flat_index(0, 1, 0), 2);
    /// assert_eq!(e.flat_index(1, 0, 0), 6);
    /// ```
    pub fn flat_index(&self, row: usize, col: usize, channel: usize) -> usize {
        (row * self.cols + col) * self.channels + channel
    }

    /// Maps a flat-buffer position back to its `(row, col, channel)`
    /// coordinate. Inverse of [`flat_index`](Extents::flat_index).
    pub fn coordinate(&self, index: usize) -> (usize, usize, usize) {
        let channel = index % self.channels;
        let flat_rc = index / self.channels;
        (flat_rc / self.cols, flat_rc % self.cols, channel)
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.rows, self.cols, self.channels)
    }
}
