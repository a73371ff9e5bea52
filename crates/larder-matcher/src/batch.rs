// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch matching for one shopping-list generation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use larder_core::{
    GenerationLog, GenerationRecord, GenerationSummary, IngredientRequest, LarderError,
    MatchTier, MatchingResult,
};

use crate::matcher::{IngredientMatcher, PantrySnapshot};

/// Confirm-tier results at or above this score count as auto-matched.
pub const DEFAULT_AUTO_CONFIRM_THRESHOLD: f64 = 85.0;

/// Tier used for counting and display.
///
/// A confirm-tier result whose best score reaches `auto_confirm_threshold`
/// is promoted to auto. The stored tier is never changed.
pub fn effective_tier(result: &MatchingResult, auto_confirm_threshold: f64) -> MatchTier {
    match (&result.match_tier, &result.best_match) {
        (MatchTier::Confirm, Some(best)) if best.confidence_score >= auto_confirm_threshold => {
            MatchTier::Auto
        }
        (tier, _) => *tier,
    }
}

/// Count results by effective tier.
pub fn summarize(results: Vec<MatchingResult>, auto_confirm_threshold: f64) -> GenerationSummary {
    let mut summary = GenerationSummary {
        auto_matched: 0,
        confirm_needed: 0,
        missing: 0,
        results: Vec::new(),
    };
    for result in &results {
        match effective_tier(result, auto_confirm_threshold) {
            MatchTier::Auto => summary.auto_matched += 1,
            MatchTier::Confirm => summary.confirm_needed += 1,
            MatchTier::Missing => summary.missing += 1,
        }
    }
    summary.results = results;
    summary
}

/// Matches a list of ingredients against one pantry snapshot.
pub struct BatchOrchestrator {
    matcher: Arc<IngredientMatcher>,
    generations: Option<Arc<dyn GenerationLog>>,
    default_auto_confirm_threshold: f64,
}

impl BatchOrchestrator {
    pub fn new(matcher: Arc<IngredientMatcher>) -> Self {
        Self {
            matcher,
            generations: None,
            default_auto_confirm_threshold: DEFAULT_AUTO_CONFIRM_THRESHOLD,
        }
    }

    /// Persist a generation record after every non-empty batch.
    pub fn with_generation_log(mut self, generations: Arc<dyn GenerationLog>) -> Self {
        self.generations = Some(generations);
        self
    }

    pub fn with_auto_confirm_threshold(mut self, threshold: f64) -> Self {
        self.default_auto_confirm_threshold = threshold;
        self
    }

    /// Match every ingredient in order and summarize.
    ///
    /// The pantry is read at most once, on the first cache miss. Any
    /// infrastructure error aborts the batch; recording the generation is
    /// best-effort.
    pub async fn batch_match(
        &self,
        user_id: &str,
        ingredients: &[IngredientRequest],
        auto_confirm_threshold: Option<f64>,
    ) -> Result<GenerationSummary, LarderError> {
        let threshold = auto_confirm_threshold.unwrap_or(self.default_auto_confirm_threshold);
        let mut snapshot: Option<PantrySnapshot> = None;
        let mut results = Vec::with_capacity(ingredients.len());

        for request in ingredients {
            let result = self
                .matcher
                .match_with_snapshot(user_id, request, &mut snapshot)
                .await?;
            results.push(result);
        }

        let summary = summarize(results, threshold);
        info!(
            user_id,
            total = summary.total(),
            auto_matched = summary.auto_matched,
            confirm_needed = summary.confirm_needed,
            missing = summary.missing,
            pantry_read = snapshot.is_some(),
            "batch match complete"
        );

        self.record_generation(user_id, &summary).await;
        Ok(summary)
    }

    async fn record_generation(&self, user_id: &str, summary: &GenerationSummary) {
        let Some(generations) = &self.generations else {
            return;
        };
        if summary.total() == 0 {
            debug!(user_id, "empty batch, no generation recorded");
            return;
        }
        let record = GenerationRecord::from_summary(user_id, summary);
        if let Err(e) = generations.record_generation(&record).await {
            warn!(user_id, error = %e, "failed to record generation summary");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_config::model::MatchingConfig;
    use larder_core::{MatchCandidate, StorageType};
    use larder_test_utils::fixtures::{pantry_item, request, sample_pantry};
    use larder_test_utils::{MemoryGenerationLog, MemorySuggestionStore, MockPantry};
    use tracing_test::traced_test;

    use crate::cache::SuggestionCache;
    use crate::similarity::EditRatioScorer;

    fn result_with(tier: MatchTier, score: Option<f64>) -> MatchingResult {
        let best = score.map(|confidence_score| MatchCandidate {
            ingredient_name: "x".to_string(),
            pantry_item_id: "p".to_string(),
            pantry_item_name: "x".to_string(),
            available_quantity: 1.0,
            available_unit: "g".to_string(),
            confidence_score,
            match_tier: tier,
            storage_type: StorageType::Pantry,
            expiration_date: None,
        });
        MatchingResult {
            ingredient_name: "x".to_string(),
            required_quantity: 1.0,
            required_unit: "g".to_string(),
            matches: best.iter().cloned().collect(),
            best_match: best,
            match_tier: tier,
            needs_to_buy: 0.0,
            from_cache: false,
        }
    }

    fn orchestrator(pantry: Arc<MockPantry>) -> (BatchOrchestrator, Arc<MemoryGenerationLog>) {
        let matcher = IngredientMatcher::new(
            &MatchingConfig::default(),
            pantry,
            SuggestionCache::new(Arc::new(MemorySuggestionStore::new()), 24),
            Arc::new(EditRatioScorer),
        )
        .unwrap();
        let log = Arc::new(MemoryGenerationLog::new());
        let batch = BatchOrchestrator::new(Arc::new(matcher)).with_generation_log(log.clone());
        (batch, log)
    }

    #[test]
    fn effective_tier_promotes_strong_confirms_only() {
        assert_eq!(
            effective_tier(&result_with(MatchTier::Confirm, Some(85.0)), 85.0),
            MatchTier::Auto
        );
        assert_eq!(
            effective_tier(&result_with(MatchTier::Confirm, Some(84.9)), 85.0),
            MatchTier::Confirm
        );
        assert_eq!(
            effective_tier(&result_with(MatchTier::Missing, Some(60.0)), 50.0),
            MatchTier::Missing
        );
        assert_eq!(
            effective_tier(&result_with(MatchTier::Missing, None), 0.0),
            MatchTier::Missing
        );
    }

    #[test]
    fn summarize_counts_and_keeps_stored_tiers() {
        let results = vec![
            result_with(MatchTier::Auto, Some(100.0)),
            result_with(MatchTier::Confirm, Some(88.0)),
            result_with(MatchTier::Confirm, Some(72.0)),
            result_with(MatchTier::Missing, None),
        ];
        let summary = summarize(results, 85.0);
        assert_eq!(summary.auto_matched, 2);
        assert_eq!(summary.confirm_needed, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.results[1].match_tier, MatchTier::Confirm);

        let strict = summarize(summary.results, 100.1);
        assert_eq!(strict.auto_matched, 1);
        assert_eq!(strict.confirm_needed, 2);
    }

    #[tokio::test]
    async fn preserves_order_and_reads_pantry_once() {
        let pantry = Arc::new(MockPantry::with_items("u1", sample_pantry()));
        let (batch, log) = orchestrator(pantry.clone());
        let ingredients = vec![
            request("eggs", 2.0, "count"),
            request("saffron", 1.0, "g"),
            request("chicken breast", 2.0, "lbs"),
            request("flour", 250.0, "g"),
        ];

        let summary = batch.batch_match("u1", &ingredients, None).await.unwrap();
        let names: Vec<&str> = summary
            .results
            .iter()
            .map(|r| r.ingredient_name.as_str())
            .collect();
        assert_eq!(names, vec!["eggs", "saffron", "chicken breast", "flour"]);
        assert_eq!(pantry.fetch_count(), 1);
        assert_eq!(
            summary.auto_matched + summary.confirm_needed + summary.missing,
            summary.total()
        );
        assert_eq!(log.records().await.len(), 1);
    }

    #[tokio::test]
    async fn fully_cached_batch_skips_the_pantry() {
        let pantry = Arc::new(MockPantry::with_items("u1", sample_pantry()));
        let (batch, _log) = orchestrator(pantry.clone());
        let ingredients = vec![request("eggs", 2.0, "count"), request("milk", 1.0, "l")];

        batch.batch_match("u1", &ingredients, None).await.unwrap();
        let again = batch.batch_match("u1", &ingredients, None).await.unwrap();

        assert!(again.results.iter().all(|r| r.from_cache));
        assert_eq!(pantry.fetch_count(), 1);
    }

    #[tokio::test]
    async fn empty_batch_is_empty_summary() {
        let pantry = Arc::new(MockPantry::new());
        let (batch, log) = orchestrator(pantry.clone());
        let summary = batch.batch_match("u1", &[], None).await.unwrap();
        assert_eq!(summary.total(), 0);
        assert_eq!(pantry.fetch_count(), 0);
        assert!(log.records().await.is_empty());
    }

    #[tokio::test]
    #[traced_test]
    async fn generation_log_failure_does_not_fail_the_batch() {
        let matcher = IngredientMatcher::new(
            &MatchingConfig::default(),
            Arc::new(MockPantry::with_items(
                "u1",
                vec![pantry_item("p1", "rice", 1.0, "kg")],
            )),
            SuggestionCache::new(Arc::new(MemorySuggestionStore::new()), 24),
            Arc::new(EditRatioScorer),
        )
        .unwrap();
        let batch = BatchOrchestrator::new(Arc::new(matcher))
            .with_generation_log(Arc::new(MemoryGenerationLog::failing()));

        let summary = batch
            .batch_match("u1", &[request("rice", 500.0, "g")], None)
            .await
            .unwrap();
        assert_eq!(summary.auto_matched, 1);
        assert!(logs_contain("failed to record generation summary"));
    }
}
