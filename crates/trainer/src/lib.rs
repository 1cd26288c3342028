// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # trainer
//!
//! The topmost consumers of the view algebra: loss functions and the
//! gradient-descent optimizer.
//!
//! A forward pass (owned by the external layer container) hands this crate
//! truth and prediction tensors. Losses build a second expression graph
//! representing per-element error and gradients; the Adam optimizer folds
//! gradient graphs into materialized parameter updates.
//!
//! Provided:
//! - [`LossFunction`] with [`MeanSquaredError`], [`MeanAbsoluteError`],
//!   [`SmoothMeanAbsoluteError`] (Huber), and the deliberately
//!   unimplemented [`BinaryCrossEntropy`].
//! - [`Adam`] — Adam with optional Demon learning-rate decay.
//! - [`TrainConfig`] — TOML-loadable configuration with loss/optimizer
//!   factories.

mod adam;
mod config;
mod error;
mod loss;

pub use adam::{Adam, BETA1, BETA2, EPSILON, MAX_LEARNING_RATE, MIN_LEARNING_RATE};
pub use config::TrainConfig;
pub use error::TrainError;
pub use loss::{
    BatchLoss, BinaryCrossEntropy, LossFunction, MeanAbsoluteError, MeanSquaredError,
    SmoothMeanAbsoluteError,
};
