// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-views
//!
//! The lazy view algebra over the [`tensor_core::Tensor`] contract.
//!
//! A view owns no element data. It holds shared handles to one, two, or
//! three child tensors and computes each coordinate on demand, so building
//! an expression allocates nothing beyond the node itself. Graphs are DAGs
//! of shared owners — the same sub-expression may feed several parents.
//!
//! Provided views:
//! - Composition bases: [`PointwiseUnary`], [`PointwiseBinary`],
//!   [`MaskedSelect`].
//! - Structural: [`Transpose`], [`Rotate180`], [`ZeroPad`], [`RowFlatten`],
//!   [`ChannelSelect`].
//! - Convolutional: [`CrossCorrelation`] (valid and full), with convolution
//!   expressed as correlation by a 180°-rotated kernel.
//! - Matrix algebra: [`linalg::invert`] (per-channel Gauss-Jordan) and
//!   [`MatrixDivide`].
//!
//! The [`ops`] module is the front door: free constructor functions that
//! perform all shape validation and return [`tensor_core::TensorRef`]s.
//! Invalid shapes fail at construction; access never re-validates.

mod compose;
mod correlate;
pub mod linalg;
pub mod ops;
mod structural;

pub use compose::{MaskedSelect, PointwiseBinary, PointwiseUnary};
pub use correlate::CrossCorrelation;
pub use linalg::MatrixDivide;
pub use structural::{ChannelSelect, Rotate180, RowFlatten, Transpose, ZeroPad};
