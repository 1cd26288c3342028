// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! The read contract and leaf tensors of the lazy expression engine.
//!
//! This crate provides:
//! - [`Tensor`] — the 3-dimensional (row × column × channel) read contract
//!   every leaf and view implements.
//! - [`Extents`] — immutable extent descriptors with flat-index arithmetic.
//! - [`DenseTensor`] — the materialized, buffer-owning leaf.
//! - [`UniformTensor`], [`IdentityTensor`], [`FnTensor`] — bufferless leaves.
//! - [`materialize`] — collapses a view graph into a [`DenseTensor`],
//!   row-parallel via `rayon` when the graph permits it.
//!
//! # Design Goals
//! - Views never copy child data; children are shared through [`TensorRef`].
//! - Shape errors are raised at construction, never at access.
//! - Clean error types via `thiserror`.

mod dense;
mod error;
mod extents;
mod leaf;
mod tensor;

pub use dense::DenseTensor;
pub use error::TensorError;
pub use extents::Extents;
pub use leaf::{FnTensor, IdentityTensor, UniformTensor};
pub use tensor::{materialize, Tensor, TensorRef};
