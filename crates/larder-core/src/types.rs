// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records shared by the matcher, the storage layer, and the CLI.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Timestamp layout used for every persisted timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Format a UTC timestamp the way it is stored in SQLite.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp back into UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Health status reported by storage health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Operational but experiencing issues.
    Degraded(String),
    /// Not operational.
    Unhealthy(String),
}

/// Where a pantry item is kept.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Pantry,
    Fridge,
    Freezer,
}

/// Confidence classification of a pantry match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Used without asking the user.
    Auto,
    /// Plausible, needs user confirmation.
    Confirm,
    /// No pantry item is close enough.
    Missing,
}

impl MatchTier {
    /// Whether a candidate of this tier may cover part of the required quantity.
    pub fn is_usable(&self) -> bool {
        matches!(self, MatchTier::Auto | MatchTier::Confirm)
    }
}

/// What the user did with a suggestion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeedbackAction {
    Accepted,
    Rejected,
    Corrected,
}

/// A quantity of an ingredient the user currently owns.
///
/// Snapshots are read-only to the matcher; only non-consumed items are
/// ever handed out by a [`PantrySource`](crate::traits::PantrySource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryItem {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub storage_type: StorageType,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub category: String,
}

/// One ingredient a recipe requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientRequest {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl IngredientRequest {
    pub fn new(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }
}

/// Association between one required ingredient and one pantry item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub ingredient_name: String,
    pub pantry_item_id: String,
    pub pantry_item_name: String,
    pub available_quantity: f64,
    pub available_unit: String,
    /// Similarity on a 0-100 scale.
    pub confidence_score: f64,
    pub match_tier: MatchTier,
    pub storage_type: StorageType,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
}

/// The outcome of matching one required ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingResult {
    pub ingredient_name: String,
    pub required_quantity: f64,
    pub required_unit: String,
    /// Candidates, best first.
    pub matches: Vec<MatchCandidate>,
    pub best_match: Option<MatchCandidate>,
    pub match_tier: MatchTier,
    /// Portion of `required_quantity` still to buy, in `required_unit`.
    pub needs_to_buy: f64,
    /// Whether the candidates came from the suggestion cache.
    #[serde(default)]
    pub from_cache: bool,
}

impl MatchingResult {
    /// A result with no usable pantry item: everything must be bought.
    pub fn missing(request: &IngredientRequest) -> Self {
        Self {
            ingredient_name: request.name.clone(),
            required_quantity: request.quantity,
            required_unit: request.unit.clone(),
            matches: Vec::new(),
            best_match: None,
            match_tier: MatchTier::Missing,
            needs_to_buy: request.quantity,
            from_cache: false,
        }
    }

    /// The pantry covers some, but not all, of the required quantity.
    pub fn is_partially_available(&self) -> bool {
        self.match_tier.is_usable() && self.needs_to_buy > 0.0
    }
}

/// A cached candidate list for one `(user, normalized ingredient)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSuggestionSet {
    pub user_id: String,
    /// Normalized ingredient name (cache key).
    pub ingredient_name: String,
    /// JSON-serialized `Vec<MatchCandidate>`.
    pub candidates_json: String,
    pub computed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_stale: bool,
}

impl CachedSuggestionSet {
    /// Usable as a cache hit at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        !self.is_stale && now < self.expires_at
    }
}

/// Append-only log entry describing what the user did with a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub user_id: String,
    pub ingredient_name: String,
    pub suggested_item: Option<String>,
    pub actual_item: Option<String>,
    pub action_taken: FeedbackAction,
    pub original_confidence: Option<f64>,
    pub created_at: String,
}

impl FeedbackRecord {
    /// Create a record stamped with a fresh id and the current time.
    pub fn new(
        user_id: String,
        ingredient_name: String,
        suggested_item: Option<String>,
        actual_item: Option<String>,
        action_taken: FeedbackAction,
        original_confidence: Option<f64>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            ingredient_name,
            suggested_item,
            actual_item,
            action_taken,
            original_confidence,
            created_at: format_timestamp(&Utc::now()),
        }
    }
}

/// Tier counts across one shopping-list generation, plus the per-ingredient results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub auto_matched: usize,
    pub confirm_needed: usize,
    pub missing: usize,
    pub results: Vec<MatchingResult>,
}

impl GenerationSummary {
    pub fn total(&self) -> usize {
        self.results.len()
    }
}

/// Persisted counts of one generation, used for statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRecord {
    pub id: String,
    pub user_id: String,
    pub total_ingredients: u32,
    pub auto_matched: u32,
    pub confirm_needed: u32,
    pub missing: u32,
    pub created_at: String,
}

impl GenerationRecord {
    /// Snapshot the counts of a summary for `user_id`.
    pub fn from_summary(user_id: &str, summary: &GenerationSummary) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            total_ingredients: summary.total() as u32,
            auto_matched: summary.auto_matched as u32,
            confirm_needed: summary.confirm_needed as u32,
            missing: summary.missing as u32,
            created_at: format_timestamp(&Utc::now()),
        }
    }
}

/// Averages over a user's recent generations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingStatistics {
    pub total_generations: u64,
    pub avg_auto_matched: f64,
    pub avg_confirm_needed: f64,
    pub avg_missing: f64,
}
