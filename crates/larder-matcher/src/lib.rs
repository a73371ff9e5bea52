// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingredient-to-pantry fuzzy matching for Larder.
//!
//! Leaves first: [`units`] converts quantities, [`normalize`] cleans names,
//! [`similarity`] ranks pantry names, [`classify`] maps scores to tiers.
//! [`matcher::IngredientMatcher`] combines them behind the
//! [`cache::SuggestionCache`], [`batch::BatchOrchestrator`] runs a whole
//! shopping list against one pantry snapshot, and [`service::MatchingService`]
//! exposes the operations callers use.

pub mod batch;
pub mod cache;
pub mod classify;
pub mod feedback;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod service;
pub mod similarity;
pub mod units;

pub use batch::{effective_tier, BatchOrchestrator, DEFAULT_AUTO_CONFIRM_THRESHOLD};
pub use cache::SuggestionCache;
pub use classify::{classify, MatchThresholds};
pub use feedback::FeedbackRecorder;
pub use matcher::IngredientMatcher;
pub use metrics::register_metrics;
pub use normalize::{normalize, Normalizer};
pub use service::{MatchingService, MatchingServiceBuilder};
pub use similarity::{EditRatioScorer, ScoredCandidate, SimilarityScorer};
pub use units::convert;
