// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Score-to-tier classification.

use larder_config::model::MatchingConfig;
use larder_core::{LarderError, MatchTier};

/// Tier boundaries. Each bound is inclusive for its own tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    pub auto: f64,
    pub confirm: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            auto: 90.0,
            confirm: 70.0,
        }
    }
}

impl MatchThresholds {
    /// Checked constructor: both bounds in 0..=100 and `confirm <= auto`.
    pub fn new(auto: f64, confirm: f64) -> Result<Self, LarderError> {
        for (name, value) in [("auto", auto), ("confirm", confirm)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(LarderError::Config(format!(
                    "{name} threshold {value} is outside 0-100"
                )));
            }
        }
        if confirm > auto {
            return Err(LarderError::Config(format!(
                "confirm threshold {confirm} exceeds auto threshold {auto}"
            )));
        }
        Ok(Self { auto, confirm })
    }

    pub fn from_config(config: &MatchingConfig) -> Result<Self, LarderError> {
        Self::new(config.auto_threshold, config.confirm_threshold)
    }

    pub fn classify(&self, score: f64) -> MatchTier {
        if score >= self.auto {
            MatchTier::Auto
        } else if score >= self.confirm {
            MatchTier::Confirm
        } else {
            MatchTier::Missing
        }
    }
}

/// Classify with the default 90/70 thresholds.
pub fn classify(score: f64) -> MatchTier {
    MatchThresholds::default().classify(score)
}
