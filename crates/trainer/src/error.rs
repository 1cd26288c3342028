// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for loss computation and optimizer updates.

use tensor_core::TensorError;

/// Errors surfaced by the training core.
///
/// None of these are retried internally; the training loop decides whether
/// to abort the run or skip a batch.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    /// A tensor graph could not be built or evaluated.
    #[error("tensor error: {0}")]
    Tensor(#[from] TensorError),

    /// Configuration was missing or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// An optimizer update referenced a registration id that was never
    /// issued, or one issued for the other parameter kind.
    #[error("unknown parameter registration id {id}")]
    UnknownParameter { id: usize },

    /// A batch operation received no truth/prediction pairs.
    #[error("batch contains no truth/prediction pairs")]
    EmptyBatch,
}
