// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Larder.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Larder configuration.
///
/// Every section is optional and defaults to the production values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LarderConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Fuzzy matching thresholds and limits.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Suggestion cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("larder").join("larder.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("larder.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Matching configuration.
///
/// Tier boundaries are inclusive on their lower bound: a score equal to
/// `auto_threshold` is auto, a score equal to `confirm_threshold` is confirm.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    /// Minimum score (0-100) for an automatic match.
    #[serde(default = "default_auto_threshold")]
    pub auto_threshold: f64,

    /// Minimum score (0-100) for a match that needs confirmation.
    #[serde(default = "default_confirm_threshold")]
    pub confirm_threshold: f64,

    /// Number of ranked candidates kept per ingredient.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Largest pantry scored per ingredient; extra items are ignored.
    #[serde(default = "default_max_candidate_pool")]
    pub max_candidate_pool: usize,

    /// Confirm-tier results at or above this score count as auto-matched in summaries.
    #[serde(default = "default_auto_confirm_threshold")]
    pub auto_confirm_threshold: f64,

    /// Qualifier words dropped from names before comparison.
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            auto_threshold: default_auto_threshold(),
            confirm_threshold: default_confirm_threshold(),
            top_k: default_top_k(),
            max_candidate_pool: default_max_candidate_pool(),
            auto_confirm_threshold: default_auto_confirm_threshold(),
            stop_words: default_stop_words(),
        }
    }
}

fn default_auto_threshold() -> f64 {
    90.0
}

fn default_confirm_threshold() -> f64 {
    70.0
}

fn default_top_k() -> usize {
    5
}

fn default_max_candidate_pool() -> usize {
    500
}

fn default_auto_confirm_threshold() -> f64 {
    85.0
}

/// The default qualifier list.
pub fn default_stop_words() -> Vec<String> {
    [
        "fresh", "dried", "organic", "raw", "cooked", "chopped", "diced", "sliced",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

/// Suggestion cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// When false every match recomputes and nothing is written.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// Lifetime of a cached suggestion set in hours.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_ttl_hours() -> u32 {
    24
}
