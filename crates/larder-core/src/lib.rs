// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Larder ingredient-to-pantry matching.
//!
//! This crate provides the error type, the typed domain records, and the
//! collaborator traits shared by the matcher, the SQLite storage layer,
//! and test doubles.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LarderError;
pub use types::{
    CachedSuggestionSet, FeedbackAction, FeedbackRecord, GenerationRecord, GenerationSummary,
    HealthStatus, IngredientRequest, MatchCandidate, MatchTier, MatchingResult,
    MatchingStatistics, PantryItem, StorageType,
};

pub use traits::{FeedbackLog, GenerationLog, PantrySource, SuggestionStore};
