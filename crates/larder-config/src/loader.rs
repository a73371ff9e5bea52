// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./larder.toml` > `~/.config/larder/larder.toml` > `/etc/larder/larder.toml`,
//! with environment variable overrides via the `LARDER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LarderConfig;

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/larder/larder.toml`
/// 3. `~/.config/larder/larder.toml`
/// 4. `./larder.toml`
/// 5. `LARDER_*` environment variables
pub fn load_config() -> Result<LarderConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LarderConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LarderConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LarderConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LarderConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LarderConfig::default()))
        .merge(Toml::file("/etc/larder/larder.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("larder/larder.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("larder.toml"))
        .merge(env_provider())
}

/// Environment provider mapping the first `_` after a section name to a dot.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `LARDER_MATCHING_AUTO_THRESHOLD` must become
/// `matching.auto_threshold`, not `matching.auto.threshold`.
fn env_provider() -> Env {
    Env::prefixed("LARDER_").map(|key| {
        let key_str = key.as_str();
        let mapped = ["logging", "storage", "matching", "cache"]
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key_str.to_string());
        mapped.into()
    })
}
