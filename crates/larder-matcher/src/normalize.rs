// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingredient and pantry name normalization.
//!
//! Names are lower-cased, trimmed, whitespace-collapsed, and stripped of
//! qualifier words ("fresh", "diced", ...) that do not change what the
//! product is.

use std::collections::HashSet;

use larder_config::model::default_stop_words;

/// Name normalizer holding a stop-word set.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stop_words: HashSet<String>,
}

impl Normalizer {
    /// Build a normalizer. Stop words are compared case-insensitively.
    pub fn new<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Normalize a name.
    ///
    /// When every token is a stop word the lower-cased name is returned with
    /// its whitespace collapsed, so "Fresh" stays "fresh" instead of "".
    pub fn normalize(&self, name: &str) -> String {
        let lower = name.to_lowercase();
        let tokens: Vec<&str> = lower.split_whitespace().collect();
        let kept: Vec<&str> = tokens
            .iter()
            .copied()
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        if kept.is_empty() {
            tokens.join(" ")
        } else {
            kept.join(" ")
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(default_stop_words())
    }
}

/// Normalize with the default stop-word list.
pub fn normalize(name: &str) -> String {
    Normalizer::default().normalize(name)
}
