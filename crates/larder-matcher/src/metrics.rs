// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; with no recorder installed every call is a no-op.

use larder_core::MatchTier;
use metrics::describe_counter;

/// Register all Larder metric descriptions.
///
/// Called once at startup after a recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "larder_cache_lookups_total",
        "Suggestion cache lookups by result (hit, miss, stale, corrupt, disabled)"
    );
    describe_counter!("larder_matches_total", "Ingredient matches by tier");
    describe_counter!(
        "larder_unit_conversion_failures_total",
        "Usable matches whose unit could not be converted"
    );
    describe_counter!(
        "larder_feedback_write_failures_total",
        "Feedback records that could not be persisted"
    );
}

/// Outcome of a suggestion cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
    Stale,
    Corrupt,
    Disabled,
}

impl CacheLookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheLookup::Hit => "hit",
            CacheLookup::Miss => "miss",
            CacheLookup::Stale => "stale",
            CacheLookup::Corrupt => "corrupt",
            CacheLookup::Disabled => "disabled",
        }
    }
}

pub fn record_cache_lookup(result: CacheLookup) {
    metrics::counter!("larder_cache_lookups_total", "result" => result.as_str()).increment(1);
}

pub fn record_match(tier: MatchTier) {
    metrics::counter!("larder_matches_total", "tier" => tier.to_string()).increment(1);
}

pub fn record_conversion_failure() {
    metrics::counter!("larder_unit_conversion_failures_total").increment(1);
}

pub fn record_feedback_failure() {
    metrics::counter!("larder_feedback_write_failures_total").increment(1);
}
