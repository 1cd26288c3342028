// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Training configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! loss = "smooth-mae"
//! smoothness = 1.0
//! learning_rate = 0.001
//! demon_decay = true
//! ```

use crate::loss::{
    BinaryCrossEntropy, LossFunction, MeanAbsoluteError, MeanSquaredError,
    SmoothMeanAbsoluteError,
};
use crate::{Adam, TrainError};
use std::path::Path;

/// Configuration for the training core.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TrainConfig {
    /// Loss function name: `"mse"`, `"mae"`, `"smooth-mae"`, `"bce"`.
    pub loss: String,
    /// Smoothness threshold for `"smooth-mae"` (ignored for other losses).
    pub smoothness: Option<f32>,
    /// Base learning rate for the optimizer.
    pub learning_rate: f32,
    /// Whether the optimizer re-derives its learning rate via Demon decay.
    #[serde(default)]
    pub demon_decay: bool,
}

impl TrainConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, TrainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrainError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, TrainError> {
        toml::from_str(toml_str)
            .map_err(|e| TrainError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, TrainError> {
        toml::to_string_pretty(self)
            .map_err(|e| TrainError::Config(format!("TOML serialise error: {e}")))
    }

    /// Creates the loss function specified by this config.
    pub fn create_loss(&self) -> Result<Box<dyn LossFunction>, TrainError> {
        match self.loss.to_lowercase().as_str() {
            "mse" => Ok(Box::new(MeanSquaredError)),
            "mae" => Ok(Box::new(MeanAbsoluteError)),
            "smooth-mae" | "huber" => {
                let smoothness = self.smoothness.unwrap_or(1.0);
                if smoothness <= 0.0 {
                    return Err(TrainError::Config(format!(
                        "smoothness must be positive, got {smoothness}"
                    )));
                }
                Ok(Box::new(SmoothMeanAbsoluteError::new(smoothness)))
            }
            "bce" => Ok(Box::new(BinaryCrossEntropy)),
            other => Err(TrainError::Config(format!(
                "unknown loss '{other}'; expected 'mse', 'mae', 'smooth-mae', or 'bce'"
            ))),
        }
    }

    /// Creates the optimizer specified by this config.
    pub fn create_optimizer(&self) -> Adam {
        Adam::with_demon_decay(self.learning_rate, self.demon_decay)
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            loss: "mse".to_string(),
            smoothness: Some(1.0),
            learning_rate: 0.001,
            demon_decay: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = TrainConfig::default();
        assert_eq!(c.loss, "mse");
        assert!((c.learning_rate - 0.001).abs() < 1e-9);
        assert!(!c.demon_decay);
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
loss = "smooth-mae"
smoothness = 0.5
learning_rate = 0.01
demon_decay = true
"#;
        let c = TrainConfig::from_toml(toml).unwrap();
        assert_eq!(c.loss, "smooth-mae");
        assert_eq!(c.smoothness, Some(0.5));
        assert!(c.demon_decay);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = TrainConfig::default();
        let toml = c.to_toml().unwrap();
        let back = TrainConfig::from_toml(&toml).unwrap();
        assert_eq!(back.loss, c.loss);
        assert_eq!(back.demon_decay, c.demon_decay);
    }

    #[test]
    fn test_create_loss_variants() {
        for (name, expected) in [
            ("mse", "mse"),
            ("mae", "mae"),
            ("smooth-mae", "smooth-mae"),
            ("huber", "smooth-mae"),
            ("bce", "bce"),
        ] {
            let c = TrainConfig {
                loss: name.into(),
                ..Default::default()
            };
            assert_eq!(c.create_loss().unwrap().name(), expected);
        }
    }

    #[test]
    fn test_create_loss_unknown() {
        let c = TrainConfig {
            loss: "bogus".into(),
            ..Default::default()
        };
        assert!(c.create_loss().is_err());
    }

    #[test]
    fn test_invalid_smoothness_rejected() {
        let c = TrainConfig {
            loss: "smooth-mae".into(),
            smoothness: Some(-1.0),
            ..Default::default()
        };
        assert!(c.create_loss().is_err());
    }
}
