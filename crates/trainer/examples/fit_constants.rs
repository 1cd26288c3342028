// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: Fit a parameter tensor to a target with different losses.
//!
//! Demonstrates the public training interface end to end: a loss builds an
//! error graph, the optimizer folds the gradient into a materialized
//! parameter update, and the loop repeats.
//!
//! ```bash
//! cargo run -p trainer --example fit_constants
//! ```

use std::sync::Arc;
use tensor_core::{DenseTensor, Extents, TensorRef};
use trainer::{Adam, TrainConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let target: TensorRef =
        Arc::new(DenseTensor::from_rows(&[&[2.0, -1.0, 0.5, 3.0]])?);

    println!(
        "{:<12} {:>6} {:>14} {:>14}",
        "Loss", "Demon", "Initial loss", "Final loss",
    );
    println!("{}", "-".repeat(50));

    for (loss_name, demon) in [("mse", false), ("mse", true), ("smooth-mae", false)] {
        let config = TrainConfig {
            loss: loss_name.into(),
            smoothness: Some(1.0),
            learning_rate: 0.05,
            demon_decay: demon,
        };
        let loss = config.create_loss()?;
        let mut adam: Adam = config.create_optimizer();
        let id = adam.register_for_weight_changes();

        let mut param: TensorRef = Arc::new(DenseTensor::zeros(Extents::row(4)));
        let initial = loss.compute(&loss.calculate_error(&target, &param)?)?;

        for _ in 0..300 {
            let batch = loss.batch(&[(Arc::clone(&target), Arc::clone(&param))])?;
            let gradient: TensorRef = Arc::new(batch.gradient);
            param = Arc::new(adam.calculate_weights_change(id, &param, &gradient)?);
            adam.advance_time_step();
        }

        let final_loss = loss.compute(&loss.calculate_error(&target, &param)?)?;
        println!(
            "{:<12} {:>6} {:>14.6} {:>14.6}",
            loss_name, demon, initial, final_loss,
        );
    }

    Ok(())
}
