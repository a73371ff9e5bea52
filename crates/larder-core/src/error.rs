// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Larder matching subsystem.

use thiserror::Error;

/// The primary error type returned by Larder operations.
///
/// A pantry item that simply does not match is never an error; it is a
/// [`MatchTier::Missing`](crate::types::MatchTier::Missing) result. These
/// variants describe failures where the system could not determine a match.
#[derive(Debug, Error)]
pub enum LarderError {
    /// Configuration errors (invalid TOML, out-of-range thresholds).
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The pantry collaborator could not produce a snapshot.
    #[error("pantry source error: {message}")]
    PantrySource {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller supplied a request that cannot be matched (negative quantity, blank name).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LarderError {
    /// Whether this error comes from an unreachable collaborator rather than bad input.
    ///
    /// API layers map these to a retry state instead of a "missing" shopping-list entry.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            LarderError::Storage { .. } | LarderError::PantrySource { .. }
        )
    }
}
