// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde cannot express: threshold ranges and ordering,
//! non-zero limits, non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::LarderConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &LarderConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.logging.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.logging.log_level
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let matching = &config.matching;
    for (key, value) in [
        ("auto_threshold", matching.auto_threshold),
        ("confirm_threshold", matching.confirm_threshold),
        ("auto_confirm_threshold", matching.auto_confirm_threshold),
    ] {
        if !(0.0..=100.0).contains(&value) {
            fail(format!(
                "matching.{key} must be between 0 and 100, got {value}"
            ));
        }
    }

    if matching.confirm_threshold > matching.auto_threshold {
        fail(format!(
            "matching.confirm_threshold ({}) must not exceed matching.auto_threshold ({})",
            matching.confirm_threshold, matching.auto_threshold
        ));
    }

    if matching.top_k == 0 {
        fail("matching.top_k must be at least 1".to_string());
    }

    if matching.max_candidate_pool < matching.top_k {
        fail(format!(
            "matching.max_candidate_pool ({}) must be at least matching.top_k ({})",
            matching.max_candidate_pool, matching.top_k
        ));
    }

    if matching.stop_words.iter().any(|w| w.trim().is_empty()) {
        fail("matching.stop_words must not contain empty entries".to_string());
    }

    if config.cache.ttl_hours == 0 {
        fail("cache.ttl_hours must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
