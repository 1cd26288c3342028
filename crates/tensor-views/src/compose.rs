// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The three view composition bases: unary, binary, and trinary.
//!
//! Elementwise operations do not change shape, so they all reduce to one of
//! these carriers plus a per-coordinate function. Shape-changing views
//! (transpose, padding, cross-correlation) are concrete types in their own
//! modules instead of subclass layers.

use tensor_core::{Tensor, TensorError, TensorRef};

/// Checks that two children agree on every extent.
///
/// All elementwise binary and trinary views call this at construction;
/// a mismatch is [`TensorError::ShapeMismatch`] and the view is never built.
pub(crate) fn require_same_extents(
    op: &'static str,
    lhs: &dyn Tensor,
    rhs: &dyn Tensor,
) -> Result<(), TensorError> {
    if lhs.extents() != rhs.extents() {
        return Err(TensorError::ShapeMismatch {
            op,
            lhs: lhs.extents(),
            rhs: rhs.extents(),
        });
    }
    Ok(())
}

/// A one-child view applying a per-coordinate transform.
///
/// Inherits the child's extents unchanged.
pub struct PointwiseUnary<F> {
    child: TensorRef,
    transform: F,
}

impl<F> PointwiseUnary<F>
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    /// Wraps `child` with the given transform.
    pub fn new(child: TensorRef, transform: F) -> Self {
        Self { child, transform }
    }
}

impl<F> Tensor for PointwiseUnary<F>
where
    F: Fn(f32) -> f32 + Send + Sync,
{
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
        (self.transform)(self.child.value(row, col, channel))
    }

    fn parallel_safe(&self) -> bool {
        self.child.parallel_safe()
    }
}

/// A two-child elementwise view combining "left" and "right" values.
pub struct PointwiseBinary<F> {
    lhs: TensorRef,
    rhs: TensorRef,
    combine: F,
}

impl<F> PointwiseBinary<F>
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    /// Builds the view after checking that both children share all extents.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] on extent disagreement.
    pub fn new(
        op: &'static str,
        lhs: TensorRef,
        rhs: TensorRef,
        combine: F,
    ) -> Result<Self, TensorError> {
        require_same_extents(op, lhs.as_ref(), rhs.as_ref())?;
        Ok(Self { lhs, rhs, combine })
    }
}

impl<F> Tensor for PointwiseBinary<F>
where
    F: Fn(f32, f32) -> f32 + Send + Sync,
{
    fn rows(&self) -> usize {
        self.lhs.rows()
    }

    fn cols(&self) -> usize {
        self.lhs.cols()
    }

    fn channels(&self) -> usize {
        self.lhs.channels()
    }

    fn value(&self, row: usize, col: usize, channel: usize) -> f32 {
        (self.combine)(
            self.lhs.value(row, col, channel),
            self.rhs.value(row, col, channel),
        )
    }

    fn parallel_safe(&self) -> bool {
        self.lhs.parallel_safe() && self.rhs.parallel_safe()
    }
}

/// The trinary view: selects between two value tensors per coordinate,
/// driven by a mask tensor.
///
/// Where `mask > discriminator` the value comes from `on_true`, otherwise
/// from `on_false`. The default discriminator is 0.0, pairing naturally
/// with 0/1 masks from comparison views.
pub struct MaskedSelect {
    mask: TensorRef,
    on_true: TensorRef,
    on_false: TensorRef,
    discriminator: f32,
}

impl MaskedSelect {
    /// Builds a masked select with the default discriminator of 0.0.
    ///
    /// # Errors
    /// Returns [`TensorError::ShapeMismatch`] if the three children do not
    /// all share the same extents.
    pub fn new(
        mask: TensorRef,
        on_true: TensorRef,
        on_false: TensorRef,
    ) -> Result<Self, TensorError> {
        Self::with_discriminator(mask, on_true, on_false, 0.0)
    }

    /// Builds a masked select with an explicit discriminator.
    pub fn with_discriminator(
        mask: TensorRef,
        on_true: TensorRef,
        on_false: TensorRef,
        discriminator: f32,
    ) -> Result<Self, TensorError> {
        require_same_extents("masked select", mask.as_ref(), on_true.as_ref())?;
        require_same_extents("masked select", mask.as_ref(), on_false.as_ref())?;
        Ok(Self {
            mask,
            on_true,
            on_false,
            discriminator,
        })
    }
}

impl Tensor for MaskedSelect {
    fn rows(&self) -> usize {
        self.mask.rows()
    }

    fn cols(&self) -> usize {
        self.mask.cols()
    }

    fn channels(&self) -> usize {
        self.mask.channels()
    }

    fn value(&self, row: usize, col: usize, channel: usize) -> f32 {
        if self.mask.value(row, col, channel) > self.discriminator {
            self.on_true.value(row, col, channel)
        } else {
            self.on_false.value(row, col, channel)
        }
    }

    fn parallel_safe(&self) -> bool {
        self.mask.parallel_safe()
            && self.on_true.parallel_safe()
            && self.on_false.parallel_safe()
    }
}
