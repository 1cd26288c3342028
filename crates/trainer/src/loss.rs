// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Loss functions over lazy error tensors.
//!
//! Every loss follows the same two-phase contract: build a per-element
//! error tensor from truth and prediction (a view graph, nothing is
//! evaluated yet), then reduce it to a scalar loss — or fold a whole batch
//! into a total loss plus an averaged gradient tensor.

use crate::TrainError;
use tensor_core::{materialize, DenseTensor, TensorError, TensorRef};
use tensor_views::ops;

/// Epsilon used when deriving the sign of a difference as
/// `diff / (|diff| + ε)`.
const SIGN_EPSILON: f32 = 1e-8;

/// The result of folding a batch of truth/prediction pairs.
#[derive(Debug)]
pub struct BatchLoss {
    /// Sum of per-example losses across the batch.
    pub total_loss: f32,
    /// Gradient tensor averaged over the batch, materialized.
    pub gradient: DenseTensor,
}

/// The two-phase loss contract.
///
/// `calculate_error` builds the per-element error view; `compute` reduces
/// an error view to the scalar loss; `batch` folds many pairs into a total
/// loss and an averaged gradient.
pub trait LossFunction: Send + Sync {
    /// A short name for logs and config files.
    fn name(&self) -> &'static str;

    /// Builds the per-element error view for one truth/prediction pair.
    fn calculate_error(
        &self,
        truth: &TensorRef,
        prediction: &TensorRef,
    ) -> Result<TensorRef, TrainError>;

    /// Reduces an error tensor (as produced by
    /// [`calculate_error`](LossFunction::calculate_error)) to a scalar.
    fn compute(&self, error: &TensorRef) -> Result<f32, TrainError>;

    /// Folds a batch of `(truth, prediction)` pairs into a total loss and
    /// an averaged gradient.
    fn batch(&self, pairs: &[(TensorRef, TensorRef)]) -> Result<BatchLoss, TrainError>;
}

/// Shared batch fold: sums `per_example_loss` and averages
/// `per_example_gradient` over the batch, materializing the result.
fn fold_batch<L, G>(
    pairs: &[(TensorRef, TensorRef)],
    per_example_loss: L,
    per_example_gradient: G,
) -> Result<BatchLoss, TrainError>
where
    L: Fn(&TensorRef, &TensorRef) -> Result<f32, TrainError>,
    G: Fn(&TensorRef, &TensorRef) -> Result<TensorRef, TrainError>,
{
    let (first_truth, _) = pairs.first().ok_or(TrainError::EmptyBatch)?;

    let mut total_loss = 0.0;
    let mut gradient_sum: TensorRef =
        std::sync::Arc::new(DenseTensor::zeros(first_truth.extents()));

    for (truth, prediction) in pairs {
        total_loss += per_example_loss(truth, prediction)?;
        gradient_sum = ops::add(&gradient_sum, &per_example_gradient(truth, prediction)?)?;
    }

    let averaged = ops::mul_scalar(&gradient_sum, 1.0 / pairs.len() as f32);
    Ok(BatchLoss {
        total_loss,
        gradient: materialize(averaged.as_ref()),
    })
}

// ── Mean squared error ─────────────────────────────────────────

/// Mean squared error: loss = mean((prediction − truth)²).
///
/// The error tensor is the raw signed difference; squaring happens in the
/// reduction, and the gradient is `2 × error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl LossFunction for MeanSquaredError {
    fn name(&self) -> &'static str {
        "mse"
    }

    fn calculate_error(
        &self,
        truth: &TensorRef,
        prediction: &TensorRef,
    ) -> Result<TensorRef, TrainError> {
        Ok(ops::sub(prediction, truth)?)
    }

    fn compute(&self, error: &TensorRef) -> Result<f32, TrainError> {
        Ok(ops::power(error, 2.0).arithmetic_mean())
    }

    fn batch(&self, pairs: &[(TensorRef, TensorRef)]) -> Result<BatchLoss, TrainError> {
        fold_batch(
            pairs,
            |truth, prediction| self.compute(&self.calculate_error(truth, prediction)?),
            |truth, prediction| {
                Ok(ops::mul_scalar(
                    &self.calculate_error(truth, prediction)?,
                    2.0,
                ))
            },
        )
    }
}

// ── Mean absolute error ────────────────────────────────────────

/// Mean absolute error (L1): loss = mean(|prediction − truth|).
///
/// The batch gradient accumulates `−(prediction − truth)` per example,
/// divided by the batch size.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAbsoluteError;

impl LossFunction for MeanAbsoluteError {
    fn name(&self) -> &'static str {
        "mae"
    }

    fn calculate_error(
        &self,
        truth: &TensorRef,
        prediction: &TensorRef,
    ) -> Result<TensorRef, TrainError> {
        Ok(ops::abs(&ops::sub(prediction, truth)?))
    }

    fn compute(&self, error: &TensorRef) -> Result<f32, TrainError> {
        Ok(error.arithmetic_mean())
    }

    fn batch(&self, pairs: &[(TensorRef, TensorRef)]) -> Result<BatchLoss, TrainError> {
        fold_batch(
            pairs,
            |truth, prediction| self.compute(&self.calculate_error(truth, prediction)?),
            |truth, prediction| Ok(ops::mul_scalar(&ops::sub(prediction, truth)?, -1.0)),
        )
    }
}

// ── Smooth MAE (Huber) ─────────────────────────────────────────

/// Smooth mean absolute error: quadratic inside the smoothness threshold,
/// linear outside it.
///
/// Per element with `d = prediction − truth`:
/// - `|d| < smoothness` → `0.5·d²/smoothness`
/// - otherwise → `|d| − 0.5·smoothness`
///
/// The derivative mirrors the split: `d/smoothness` in the quadratic
/// region, `sign(d)` in the linear one. Both are expressed through a
/// less-than mask and masked select, so the branch itself is part of the
/// view graph.
#[derive(Debug, Clone, Copy)]
pub struct SmoothMeanAbsoluteError {
    smoothness: f32,
}

impl SmoothMeanAbsoluteError {
    /// Creates the loss with the given smoothness threshold.
    pub fn new(smoothness: f32) -> Self {
        Self { smoothness }
    }

    fn derivative(
        &self,
        truth: &TensorRef,
        prediction: &TensorRef,
    ) -> Result<TensorRef, TrainError> {
        let diff = ops::sub(prediction, truth)?;
        let abs_diff = ops::abs(&diff);
        let mask = ops::less_than(&abs_diff, self.smoothness);
        let quadratic = ops::mul_scalar(&diff, 1.0 / self.smoothness);
        let sign = ops::mul(&diff, &ops::inverse(&abs_diff, SIGN_EPSILON))?;
        Ok(ops::masked_select(&mask, &quadratic, &sign)?)
    }
}

impl Default for SmoothMeanAbsoluteError {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl LossFunction for SmoothMeanAbsoluteError {
    fn name(&self) -> &'static str {
        "smooth-mae"
    }

    fn calculate_error(
        &self,
        truth: &TensorRef,
        prediction: &TensorRef,
    ) -> Result<TensorRef, TrainError> {
        let diff = ops::sub(prediction, truth)?;
        let abs_diff = ops::abs(&diff);
        let mask = ops::less_than(&abs_diff, self.smoothness);
        let quadratic = ops::mul_scalar(&ops::power(&diff, 2.0), 0.5 / self.smoothness);
        let linear = ops::add_scalar(&abs_diff, -0.5 * self.smoothness);
        Ok(ops::masked_select(&mask, &quadratic, &linear)?)
    }

    fn compute(&self, error: &TensorRef) -> Result<f32, TrainError> {
        Ok(error.arithmetic_mean())
    }

    fn batch(&self, pairs: &[(TensorRef, TensorRef)]) -> Result<BatchLoss, TrainError> {
        fold_batch(
            pairs,
            |truth, prediction| self.compute(&self.calculate_error(truth, prediction)?),
            |truth, prediction| self.derivative(truth, prediction),
        )
    }
}

// ── Binary cross-entropy (deliberately unfinished) ─────────────

/// Binary cross-entropy: `−mean(truth·log(pred) + (1−truth)·log(1−pred))`.
///
/// Not implemented. Every operation returns
/// [`TensorError::NotImplemented`] so a caller can never mistake a missing
/// loss for a computed one.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCrossEntropy;

impl LossFunction for BinaryCrossEntropy {
    fn name(&self) -> &'static str {
        "bce"
    }

    fn calculate_error(
        &self,
        _truth: &TensorRef,
        _prediction: &TensorRef,
    ) -> Result<TensorRef, TrainError> {
        Err(TensorError::NotImplemented {
            op: "binary cross-entropy",
        }
        .into())
    }

    fn compute(&self, _error: &TensorRef) -> Result<f32, TrainError> {
        Err(TensorError::NotImplemented {
            op: "binary cross-entropy",
        }
        .into())
    }

    fn batch(&self, _pairs: &[(TensorRef, TensorRef)]) -> Result<BatchLoss, TrainError> {
        Err(TensorError::NotImplemented {
            op: "binary cross-entropy",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tensor_core::{DenseTensor, Tensor};

    fn row(values: &[f32]) -> TensorRef {
        Arc::new(DenseTensor::from_rows(&[values]).unwrap())
    }

    #[test]
    fn test_mse_reference_values() {
        let truth = row(&[1.0, 0.0]);
        let pred = row(&[0.5, 0.5]);
        let loss = MeanSquaredError;
        let error = loss.calculate_error(&truth, &pred).unwrap();
        assert!((loss.compute(&error).unwrap() - 0.25).abs() < 1e-6);

        // 2 × error = [-1.0, 1.0]
        let grad = ops::mul_scalar(&error, 2.0);
        assert!((grad.value(0, 0, 0) + 1.0).abs() < 1e-6);
        assert!((grad.value(0, 1, 0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mse_zero_for_perfect_prediction() {
        let truth = row(&[0.3, -0.7, 2.0]);
        let loss = MeanSquaredError;
        let error = loss.calculate_error(&truth, &truth).unwrap();
        assert!(loss.compute(&error).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_mse_batch_averages_gradient() {
        let loss = MeanSquaredError;
        let pairs = vec![
            (row(&[0.0, 0.0]), row(&[1.0, 1.0])),
            (row(&[0.0, 0.0]), row(&[3.0, 3.0])),
        ];
        let result = loss.batch(&pairs).unwrap();
        // Per-example losses: 1.0 and 9.0.
        assert!((result.total_loss - 10.0).abs() < 1e-6);
        // Gradients 2·1 and 2·3, averaged → 4.0.
        assert!((result.gradient.value(0, 0, 0) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_mae_reference_values() {
        let truth = row(&[1.0, 0.0]);
        let pred = row(&[0.5, 0.5]);
        let loss = MeanAbsoluteError;
        let error = loss.calculate_error(&truth, &pred).unwrap();
        assert!((loss.compute(&error).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mae_batch_gradient_sign() {
        let loss = MeanAbsoluteError;
        let pairs = vec![(row(&[0.0]), row(&[2.0]))];
        let result = loss.batch(&pairs).unwrap();
        // −(pred − truth) = −2.0
        assert!((result.gradient.value(0, 0, 0) + 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_mae_quadratic_region() {
        let loss = SmoothMeanAbsoluteError::new(1.0);
        let error = loss
            .calculate_error(&row(&[0.0]), &row(&[0.5]))
            .unwrap();
        // 0.5 · 0.25 / 1.0 = 0.125
        assert!((error.value(0, 0, 0) - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_mae_linear_region() {
        let loss = SmoothMeanAbsoluteError::new(1.0);
        let error = loss
            .calculate_error(&row(&[0.0]), &row(&[2.0]))
            .unwrap();
        // 2.0 − 0.5 = 1.5
        assert!((error.value(0, 0, 0) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_smooth_mae_derivative_split() {
        let loss = SmoothMeanAbsoluteError::new(1.0);
        let pairs = vec![(row(&[0.0, 0.0, 0.0]), row(&[0.5, 2.0, -2.0]))];
        let result = loss.batch(&pairs).unwrap();
        // Quadratic region: d/smoothness = 0.5. Linear: sign(d) = ±1.
        assert!((result.gradient.value(0, 0, 0) - 0.5).abs() < 1e-6);
        assert!((result.gradient.value(0, 1, 0) - 1.0).abs() < 1e-4);
        assert!((result.gradient.value(0, 2, 0) + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_bce_is_explicitly_unimplemented() {
        let loss = BinaryCrossEntropy;
        let truth = row(&[1.0]);
        let pred = row(&[0.5]);
        assert!(matches!(
            loss.calculate_error(&truth, &pred).err(),
            Some(TrainError::Tensor(TensorError::NotImplemented { .. }))
        ));
        assert!(loss.batch(&[(truth, pred)]).is_err());
    }

    #[test]
    fn test_empty_batch_rejected() {
        let loss = MeanSquaredError;
        assert!(matches!(
            loss.batch(&[]).unwrap_err(),
            TrainError::EmptyBatch
        ));
    }

    #[test]
    fn test_batch_shape_mismatch_propagates() {
        let loss = MeanSquaredError;
        let pairs = vec![(row(&[0.0, 0.0]), row(&[1.0]))];
        assert!(matches!(
            loss.batch(&pairs).unwrap_err(),
            TrainError::Tensor(TensorError::ShapeMismatch { .. })
        ));
    }
}
