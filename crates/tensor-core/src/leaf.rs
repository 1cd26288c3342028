// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bufferless leaf tensors: uniform fill, identity, and function-backed.
//!
//! These leaves sit at the bottom of expression graphs alongside
//! [`crate::DenseTensor`] but never allocate element storage; their values
//! are implied by the extents and a rule.

use crate::{Extents, Tensor};

/// A tensor whose every element holds the same value.
#[derive(Debug, Clone, Copy)]
pub struct UniformTensor {
    extents: Extents,
    value: f32,
}

impl UniformTensor {
    /// Creates a uniform tensor.
    pub fn new(extents: Extents, value: f32) -> Self {
        Self { extents, value }
    }
}

impl Tensor for UniformTensor {
    fn rows(&self) -> usize {
        self.extents.rows()
    }

    fn cols(&self) -> usize {
        self.extents.cols()
    }

    fn channels(&self) -> usize {
        self.extents.channels()
    }

    fn value(&self, _row: usize, _col: usize, _channel: usize) -> f32 {
        self.value
    }
}

/// A square identity matrix replicated across every channel: 1.0 on the
/// main diagonal, 0.0 elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct IdentityTensor {
    order: usize,
    channels: usize,
}

impl IdentityTensor {
    /// Creates an `order × order` identity with the given channel count.
    pub fn new(order: usize, channels: usize) -> Self {
        Self { order, channels }
    }
}

impl Tensor for IdentityTensor {
    fn rows(&self) -> usize {
        self.order
    }

    fn cols(&self) -> usize {
        self.order
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn value(&self, row: usize, col: usize, _channel: usize) -> f32 {
        if row == col {
            1.0
        } else {
            0.0
        }
    }
}

/// A tensor backed by a pure coordinate function.
///
/// Useful for synthetic inputs and tests; the function must be
/// deterministic so reads stay referentially transparent.
pub struct FnTensor {
    extents: Extents,
    generator: Box<dyn Fn(usize, usize, usize) -> f32 + Send + Sync>,
}

impl FnTensor {
    /// Creates a function-backed tensor.
    pub fn new<F>(extents: Extents, generator: F) -> Self
    where
        F: Fn(usize, usize, usize) -> f32 + Send + Sync + 'static,
    {
        Self {
            extents,
            generator: Box::new(generator),
        }
    }
}

impl Tensor for FnTensor {
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
        (self.generator)(row, col, channel)
    }
}

impl std::fmt::Debug for FnTensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTensor")
            .field("extents", &self.extents)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let t = UniformTensor::new(Extents::new(2, 2, 1), 3.0);
        assert_eq!(t.value(0, 0, 0), 3.0);
        assert_eq!(t.value(1, 1, 0), 3.0);
        assert!((t.sum() - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_identity() {
        let t = IdentityTensor::new(3, 2);
        for ch in 0..2 {
            for r in 0..3 {
                for c in 0..3 {
                    let expected = if r == c { 1.0 } else { 0.0 };
                    assert_eq!(t.value(r, c, ch), expected);
                }
            }
        }
        assert!((t.sum() - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_fn_tensor() {
        let t = FnTensor::new(Extents::matrix(2, 3), |r, c, _| (r * 3 + c) as f32);
        assert_eq!(t.value(0, 0, 0), 0.0);
        assert_eq!(t.value(1, 2, 0), 5.0);
    }

    #[test]
    fn test_fn_tensor_repeat_read() {
        let t = FnTensor::new(Extents::row(4), |_, c, _| (c as f32).sqrt());
        // Same coordinate, same value.
        assert_eq!(t.value(0, 3, 0), t.value(0, 3, 0));
    }
}
