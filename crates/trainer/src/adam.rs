// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The Adam optimizer with optional Demon learning-rate decay.
//!
//! Parameter updates are expressed through the view algebra and
//! materialized at the end of every call: the moment tensors `m` and `v`
//! persist across calls, and leaving them as views would re-evaluate an
//! ever-growing expression graph on each step.

use crate::TrainError;
use std::sync::Arc;
use tensor_core::{materialize, DenseTensor, Tensor, TensorRef};
use tensor_views::ops;

/// Exponential decay rate for the first moment.
pub const BETA1: f32 = 0.9;
/// Exponential decay rate for the second moment.
pub const BETA2: f32 = 0.999;
/// Numerical-stability constant in the update denominator.
pub const EPSILON: f32 = 1e-8;
/// Lower clamp bound for the learning rate.
pub const MIN_LEARNING_RATE: f32 = 1e-5;
/// Upper clamp bound for the learning rate.
pub const MAX_LEARNING_RATE: f32 = 1e-1;

/// Which kind of trainable parameter a registration id belongs to.
///
/// Weight and bias registrations share one id space but are averaged
/// separately by Demon decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    Weights,
    Bias,
}

/// Moving-average moment tensors for one parameter, always materialized.
struct Moments {
    m: Arc<DenseTensor>,
    v: Arc<DenseTensor>,
}

/// Per-parameter optimizer state.
///
/// Created at registration time; the moment pair stays empty until the
/// first update call, which zero-initializes it to the gradient's extents.
struct ParamState {
    kind: ParamKind,
    learning_rate: f32,
    last_rate_step: u64,
    moments: Option<Moments>,
}

/// Adam (adaptive moment estimation) with optional Demon decay.
///
/// Registration ids are issued monotonically from 0 and never reused; the
/// id indexes directly into the state table. The time step is advanced by
/// the caller (typically once per epoch), not by the optimizer.
///
/// Updates for distinct ids are independent; concurrent updates for the
/// same id require external mutual exclusion, which `&mut self` already
/// enforces within one optimizer value.
pub struct Adam {
    base_learning_rate: f32,
    demon_decay: bool,
    time_step: u64,
    params: Vec<ParamState>,
}

impl Adam {
    /// Creates an optimizer with a fixed learning rate (clamped to
    /// `[1e-5, 1e-1]`) and Demon decay disabled.
    pub fn new(learning_rate: f32) -> Self {
        Self::with_demon_decay(learning_rate, false)
    }

    /// Creates an optimizer, optionally enabling Demon decay.
    pub fn with_demon_decay(learning_rate: f32, demon_decay: bool) -> Self {
        let clamped = learning_rate.clamp(MIN_LEARNING_RATE, MAX_LEARNING_RATE);
        tracing::info!(
            "adam optimizer created: lr={clamped}, demon={demon_decay}"
        );
        Self {
            base_learning_rate: clamped,
            demon_decay,
            time_step: 1,
            params: Vec::new(),
        }
    }

    /// Registers a weight tensor for updates, returning its id.
    pub fn register_for_weight_changes(&mut self) -> usize {
        self.register(ParamKind::Weights)
    }

    /// Registers a bias tensor for updates, returning its id.
    pub fn register_for_bias_changes(&mut self) -> usize {
        self.register(ParamKind::Bias)
    }

    fn register(&mut self, kind: ParamKind) -> usize {
        let id = self.params.len();
        self.params.push(ParamState {
            kind,
            learning_rate: self.base_learning_rate,
            last_rate_step: 0,
            moments: None,
        });
        tracing::debug!("registered {kind:?} parameter with id {id}");
        id
    }

    /// The current time step.
    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    /// Advances the time step. Called by the training loop, once per epoch.
    pub fn advance_time_step(&mut self) {
        self.time_step += 1;
    }

    /// The learning rate currently in effect for a registration id.
    pub fn learning_rate(&self, id: usize) -> Option<f32> {
        self.params.get(id).map(|s| s.learning_rate)
    }

    /// The materialized moment pair `(m, v)` for a registration id, if the
    /// first update has happened.
    pub fn moments(&self, id: usize) -> Option<(&DenseTensor, &DenseTensor)> {
        self.params
            .get(id)
            .and_then(|s| s.moments.as_ref())
            .map(|mom| (mom.m.as_ref(), mom.v.as_ref()))
    }

    /// Computes the updated weight tensor for one registration id.
    ///
    /// # Errors
    /// Returns [`TrainError::UnknownParameter`] for an id that was never
    /// issued (or was issued for biases) and propagates shape mismatches
    /// between the parameter and its gradient.
    pub fn calculate_weights_change(
        &mut self,
        id: usize,
        weights: &TensorRef,
        gradient: &TensorRef,
    ) -> Result<DenseTensor, TrainError> {
        self.update(id, ParamKind::Weights, weights, gradient)
    }

    /// Computes the updated bias tensor for one registration id.
    ///
    /// # Errors
    /// Same contract as [`calculate_weights_change`](Adam::calculate_weights_change).
    pub fn calculate_bias_change(
        &mut self,
        id: usize,
        bias: &TensorRef,
        gradient: &TensorRef,
    ) -> Result<DenseTensor, TrainError> {
        self.update(id, ParamKind::Bias, bias, gradient)
    }

    fn update(
        &mut self,
        id: usize,
        kind: ParamKind,
        param: &TensorRef,
        gradient: &TensorRef,
    ) -> Result<DenseTensor, TrainError> {
        match self.params.get(id) {
            Some(state) if state.kind == kind => {}
            _ => return Err(TrainError::UnknownParameter { id }),
        }

        // Lazy zero-init of the moment pair on the first update.
        if self.params[id].moments.is_none() {
            self.params[id].moments = Some(Moments {
                m: Arc::new(DenseTensor::zeros(gradient.extents())),
                v: Arc::new(DenseTensor::zeros(gradient.extents())),
            });
        }

        // Demon decay: re-derive the learning rate once per time step.
        if self.demon_decay && self.time_step > self.params[id].last_rate_step {
            let rate = self.demon_rate(kind);
            let state = &mut self.params[id];
            state.learning_rate = rate;
            state.last_rate_step = self.time_step;
            tracing::debug!(
                "demon decay: id {id} learning rate -> {rate} at step {}",
                self.time_step
            );
        }

        let (m_prev, v_prev): (TensorRef, TensorRef) = {
            let moments = self.params[id]
                .moments
                .as_ref()
                .expect("moments initialized above");
            (moments.m.clone(), moments.v.clone())
        };

        // m ← β₁·m + (1−β₁)·g ; v ← β₂·v + (1−β₂)·g²
        let m_next = Arc::new(materialize(
            ops::add(
                &ops::mul_scalar(&m_prev, BETA1),
                &ops::mul_scalar(gradient, 1.0 - BETA1),
            )?
            .as_ref(),
        ));
        let gradient_squared = ops::mul(gradient, gradient)?;
        let v_next = Arc::new(materialize(
            ops::add(
                &ops::mul_scalar(&v_prev, BETA2),
                &ops::mul_scalar(&gradient_squared, 1.0 - BETA2),
            )?
            .as_ref(),
        ));

        // param' = param + (−lr·m) ⊙ 1/(√v + ε)
        let learning_rate = self.params[id].learning_rate;
        let m_ref: TensorRef = m_next.clone();
        let v_ref: TensorRef = v_next.clone();
        let step = ops::mul(
            &ops::mul_scalar(&m_ref, -learning_rate),
            &ops::inverse(&ops::sqrt(&v_ref), EPSILON),
        )?;
        let updated = materialize(ops::add(param, &step)?.as_ref());

        self.params[id].moments = Some(Moments {
            m: m_next,
            v: v_next,
        });
        Ok(updated)
    }

    /// Derives a Demon learning rate from the bias-corrected means of all
    /// same-kind moment tensors. Parameters not yet updated contribute
    /// zero, matching their lazily zero-initialized moments.
    fn demon_rate(&self, kind: ParamKind) -> f32 {
        let mut m_sum = 0.0;
        let mut v_sum = 0.0;
        let mut count = 0usize;
        for state in self.params.iter().filter(|s| s.kind == kind) {
            count += 1;
            if let Some(moments) = &state.moments {
                m_sum += moments.m.arithmetic_mean();
                v_sum += moments.v.arithmetic_mean();
            }
        }
        if count == 0 {
            return self.base_learning_rate;
        }

        let m_mean = m_sum / count as f32;
        let v_mean = v_sum / count as f32;
        let t = self.time_step as i32;
        let correction1 =
            (1.0 / (1.0 - BETA1.powi(t))).clamp(MIN_LEARNING_RATE, MAX_LEARNING_RATE);
        let correction2 = 1.0 / (1.0 - BETA2.powi(t));
        let m_hat = m_mean * correction1;
        let v_hat = v_mean * correction2;
        (m_hat / (v_hat.sqrt() + EPSILON)).clamp(MIN_LEARNING_RATE, MAX_LEARNING_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{Extents, UniformTensor};

    fn uniform(extents: Extents, value: f32) -> TensorRef {
        Arc::new(UniformTensor::new(extents, value))
    }

    #[test]
    fn test_first_update_moments() {
        let mut adam = Adam::new(0.001);
        let id = adam.register_for_weight_changes();

        let extents = Extents::matrix(2, 3);
        let weights = uniform(extents, 0.0);
        let gradient = uniform(extents, 1.0);

        adam.calculate_weights_change(id, &weights, &gradient).unwrap();

        // m = 0.9·0 + 0.1·1 = 0.1 ; v = 0.999·0 + 0.001·1 = 0.001
        let (m, v) = adam.moments(id).unwrap();
        for r in 0..2 {
            for c in 0..3 {
                assert!((m.value(r, c, 0) - 0.1).abs() < 1e-7);
                assert!((v.value(r, c, 0) - 0.001).abs() < 1e-7);
            }
        }
    }

    #[test]
    fn test_update_moves_against_gradient() {
        let mut adam = Adam::new(0.01);
        let id = adam.register_for_weight_changes();

        let extents = Extents::row(4);
        let weights = uniform(extents, 1.0);
        let gradient = uniform(extents, 0.5);

        let updated = adam.calculate_weights_change(id, &weights, &gradient).unwrap();
        for c in 0..4 {
            assert!(updated.value(0, c, 0) < 1.0);
        }
    }

    #[test]
    fn test_ids_are_monotonic_and_shared() {
        let mut adam = Adam::new(0.001);
        assert_eq!(adam.register_for_weight_changes(), 0);
        assert_eq!(adam.register_for_bias_changes(), 1);
        assert_eq!(adam.register_for_weight_changes(), 2);
    }

    #[test]
    fn test_unknown_id_rejected() {
        let mut adam = Adam::new(0.001);
        let t = uniform(Extents::row(1), 0.0);
        assert!(matches!(
            adam.calculate_weights_change(7, &t, &t).unwrap_err(),
            TrainError::UnknownParameter { id: 7 }
        ));
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut adam = Adam::new(0.001);
        let id = adam.register_for_bias_changes();
        let t = uniform(Extents::row(1), 0.0);
        assert!(adam.calculate_weights_change(id, &t, &t).is_err());
    }

    #[test]
    fn test_learning_rate_clamped_at_construction() {
        let adam = Adam::new(5.0);
        assert_eq!(adam.base_learning_rate, MAX_LEARNING_RATE);
        let adam = Adam::new(1e-9);
        assert_eq!(adam.base_learning_rate, MIN_LEARNING_RATE);
    }

    #[test]
    fn test_demon_adjusts_once_per_time_step() {
        let mut adam = Adam::with_demon_decay(0.01, true);
        let id = adam.register_for_weight_changes();

        let extents = Extents::row(2);
        let weights = uniform(extents, 0.0);
        let gradient = uniform(extents, 1.0);

        adam.calculate_weights_change(id, &weights, &gradient).unwrap();
        let rate_after_first = adam.learning_rate(id).unwrap();

        // Same step: rate must not move again.
        adam.calculate_weights_change(id, &weights, &gradient).unwrap();
        assert_eq!(adam.learning_rate(id).unwrap(), rate_after_first);

        // New step: rate is re-derived from the now non-zero moments.
        adam.advance_time_step();
        adam.calculate_weights_change(id, &weights, &gradient).unwrap();
        let rate_after_advance = adam.learning_rate(id).unwrap();
        assert!(rate_after_advance >= MIN_LEARNING_RATE);
        assert!(rate_after_advance <= MAX_LEARNING_RATE);
        assert_ne!(rate_after_advance, rate_after_first);
    }

    #[test]
    fn test_demon_rate_stays_clamped() {
        let mut adam = Adam::with_demon_decay(0.01, true);
        let id = adam.register_for_weight_changes();
        let extents = Extents::row(2);
        let weights = uniform(extents, 0.0);
        let gradient = uniform(extents, 100.0);

        for _ in 0..5 {
            adam.calculate_weights_change(id, &weights, &gradient).unwrap();
            adam.advance_time_step();
        }
        let rate = adam.learning_rate(id).unwrap();
        assert!((MIN_LEARNING_RATE..=MAX_LEARNING_RATE).contains(&rate));
    }

    #[test]
    fn test_weight_and_bias_moments_average_separately() {
        let mut adam = Adam::with_demon_decay(0.01, true);
        let w_id = adam.register_for_weight_changes();
        let b_id = adam.register_for_bias_changes();

        let extents = Extents::row(2);
        let zeros = uniform(extents, 0.0);
        let big = uniform(extents, 10.0);
        let small = uniform(extents, 0.01);

        adam.calculate_weights_change(w_id, &zeros, &big).unwrap();
        adam.calculate_bias_change(b_id, &zeros, &small).unwrap();
        adam.advance_time_step();
        adam.calculate_weights_change(w_id, &zeros, &big).unwrap();
        adam.calculate_bias_change(b_id, &zeros, &small).unwrap();

        // Kinds decayed from different moment pools; both stay in bounds.
        let w_rate = adam.learning_rate(w_id).unwrap();
        let b_rate = adam.learning_rate(b_id).unwrap();
        assert!((MIN_LEARNING_RATE..=MAX_LEARNING_RATE).contains(&w_rate));
        assert!((MIN_LEARNING_RATE..=MAX_LEARNING_RATE).contains(&b_rate));
    }
}
