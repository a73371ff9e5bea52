// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-ingredient matching.
//!
//! A match normalizes the ingredient name, consults the suggestion cache,
//! and on a miss scores the user's pantry, classifies the top candidates, and
//! caches them. The best candidate then decides the tier and the
//! needs-to-buy quantity.

use std::sync::Arc;

use tracing::{debug, warn};

use larder_config::model::MatchingConfig;
use larder_core::{
    IngredientRequest, LarderError, MatchCandidate, MatchTier, MatchingResult, PantryItem,
    PantrySource,
};

use crate::cache::SuggestionCache;
use crate::classify::MatchThresholds;
use crate::metrics;
use crate::normalize::Normalizer;
use crate::similarity::SimilarityScorer;
use crate::units;

/// A user's pantry with normalized names, read once per call scope.
pub struct PantrySnapshot {
    items: Vec<PantryItem>,
    normalized: Vec<String>,
}

impl PantrySnapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Matches single ingredients against a user's pantry.
pub struct IngredientMatcher {
    pantry: Arc<dyn PantrySource>,
    cache: SuggestionCache,
    scorer: Arc<dyn SimilarityScorer>,
    normalizer: Normalizer,
    thresholds: MatchThresholds,
    top_k: usize,
    max_candidate_pool: usize,
}

impl IngredientMatcher {
    pub fn new(
        config: &MatchingConfig,
        pantry: Arc<dyn PantrySource>,
        cache: SuggestionCache,
        scorer: Arc<dyn SimilarityScorer>,
    ) -> Result<Self, LarderError> {
        if config.top_k == 0 {
            return Err(LarderError::Config("top_k must be at least 1".to_string()));
        }
        Ok(Self {
            pantry,
            cache,
            scorer,
            normalizer: Normalizer::new(&config.stop_words),
            thresholds: MatchThresholds::from_config(config)?,
            top_k: config.top_k,
            max_candidate_pool: config.max_candidate_pool.max(config.top_k),
        })
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.cache
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Match one ingredient, reading the pantry only on a cache miss.
    pub async fn match_ingredient(
        &self,
        user_id: &str,
        request: &IngredientRequest,
    ) -> Result<MatchingResult, LarderError> {
        let mut snapshot = None;
        self.match_with_snapshot(user_id, request, &mut snapshot).await
    }

    /// Match one ingredient against a shared, lazily-read snapshot.
    ///
    /// The first cache miss fills `snapshot`; later calls with the same slot
    /// reuse it, so a batch sees one consistent pantry.
    pub async fn match_with_snapshot(
        &self,
        user_id: &str,
        request: &IngredientRequest,
        snapshot: &mut Option<PantrySnapshot>,
    ) -> Result<MatchingResult, LarderError> {
        validate_request(request)?;
        let normalized = self.normalizer.normalize(&request.name);

        if let Some(candidates) = self.cache.lookup(user_id, &normalized).await? {
            return Ok(self.finish(request, candidates, true));
        }

        let pantry = match snapshot {
            Some(pantry) => pantry,
            None => snapshot.insert(self.read_snapshot(user_id).await?),
        };

        if pantry.is_empty() {
            debug!(user_id, ingredient = %normalized, "empty pantry, nothing to score");
            metrics::record_match(MatchTier::Missing);
            return Ok(MatchingResult::missing(request));
        }

        let candidates = self.rank(&normalized, pantry);
        self.cache.store(user_id, &normalized, &candidates).await?;
        Ok(self.finish(request, candidates, false))
    }

    /// Read and normalize the user's pantry, capped at `max_candidate_pool` items.
    pub async fn read_snapshot(&self, user_id: &str) -> Result<PantrySnapshot, LarderError> {
        let mut items = self.pantry.get_pantry_items(user_id).await?;
        if items.len() > self.max_candidate_pool {
            warn!(
                user_id,
                pantry_size = items.len(),
                max_candidate_pool = self.max_candidate_pool,
                "pantry exceeds candidate pool, ignoring extra items"
            );
            items.truncate(self.max_candidate_pool);
        }
        let normalized = items
            .iter()
            .map(|item| self.normalizer.normalize(&item.name))
            .collect();
        debug!(user_id, items = items.len(), "pantry snapshot read");
        Ok(PantrySnapshot { items, normalized })
    }

    fn rank(&self, normalized: &str, pantry: &PantrySnapshot) -> Vec<MatchCandidate> {
        self.scorer
            .top_k(normalized, &pantry.normalized, self.top_k)
            .into_iter()
            .filter_map(|scored| {
                let item = pantry.items.get(scored.index)?;
                Some(MatchCandidate {
                    ingredient_name: normalized.to_string(),
                    pantry_item_id: item.id.clone(),
                    pantry_item_name: item.name.clone(),
                    available_quantity: item.quantity,
                    available_unit: item.unit.clone(),
                    confidence_score: scored.score,
                    match_tier: self.thresholds.classify(scored.score),
                    storage_type: item.storage_type,
                    expiration_date: item.expiration_date,
                })
            })
            .collect()
    }

    fn finish(
        &self,
        request: &IngredientRequest,
        candidates: Vec<MatchCandidate>,
        from_cache: bool,
    ) -> MatchingResult {
        let best_match = candidates.first().cloned();
        let match_tier = best_match
            .as_ref()
            .map_or(MatchTier::Missing, |best| best.match_tier);

        let needs_to_buy = match &best_match {
            Some(best) if best.match_tier.is_usable() => shortfall(request, best),
            _ => request.quantity,
        };

        metrics::record_match(match_tier);
        MatchingResult {
            ingredient_name: request.name.clone(),
            required_quantity: request.quantity,
            required_unit: request.unit.clone(),
            matches: candidates,
            best_match,
            match_tier,
            needs_to_buy,
            from_cache,
        }
    }
}

/// Portion of the request the best match does not cover, in the request's unit.
fn shortfall(request: &IngredientRequest, best: &MatchCandidate) -> f64 {
    match units::convert(best.available_quantity, &best.available_unit, &request.unit) {
        Some(available) if available.is_finite() => {
            (request.quantity - available.max(0.0)).clamp(0.0, request.quantity)
        }
        _ => {
            warn!(
                ingredient = %request.name,
                pantry_item = %best.pantry_item_name,
                from_unit = %best.available_unit,
                to_unit = %request.unit,
                "no unit conversion, assuming full quantity is needed"
            );
            metrics::record_conversion_failure();
            request.quantity
        }
    }
}

fn validate_request(request: &IngredientRequest) -> Result<(), LarderError> {
    if request.name.trim().is_empty() {
        return Err(LarderError::InvalidInput(
            "ingredient name is empty".to_string(),
        ));
    }
    if !request.quantity.is_finite() || request.quantity < 0.0 {
        return Err(LarderError::InvalidInput(format!(
            "ingredient {} has invalid quantity {}",
            request.name, request.quantity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use larder_test_utils::fixtures::{pantry_item, request, sample_pantry};
    use larder_test_utils::{FailingPantry, MemorySuggestionStore, MockPantry};
    use tracing_test::traced_test;

    use crate::similarity::{EditRatioScorer, ScoredCandidate};

    /// Delegates to the default scorer and counts invocations.
    #[derive(Default)]
    struct CountingScorer {
        calls: AtomicUsize,
    }

    impl SimilarityScorer for CountingScorer {
        fn top_k(&self, query: &str, candidates: &[String], k: usize) -> Vec<ScoredCandidate> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            EditRatioScorer.top_k(query, candidates, k)
        }
    }

    struct Fixture {
        matcher: IngredientMatcher,
        pantry: Arc<MockPantry>,
        store: Arc<MemorySuggestionStore>,
        scorer: Arc<CountingScorer>,
    }

    fn fixture(items: Vec<PantryItem>) -> Fixture {
        fixture_with(items, MatchingConfig::default())
    }

    fn fixture_with(items: Vec<PantryItem>, config: MatchingConfig) -> Fixture {
        let pantry = Arc::new(MockPantry::with_items("u1", items));
        let store = Arc::new(MemorySuggestionStore::new());
        let scorer = Arc::new(CountingScorer::default());
        let matcher = IngredientMatcher::new(
            &config,
            pantry.clone(),
            SuggestionCache::new(store.clone(), 24),
            scorer.clone(),
        )
        .unwrap();
        Fixture {
            matcher,
            pantry,
            store,
            scorer,
        }
    }

    #[tokio::test]
    async fn empty_pantry_is_missing_and_not_cached() {
        let f = fixture(Vec::new());
        let req = request("chicken breast", 2.0, "lbs");
        let result = f.matcher.match_ingredient("u1", &req).await.unwrap();

        assert_eq!(result, MatchingResult::missing(&req));
        assert_eq!(result.match_tier, MatchTier::Missing);
        assert_eq!(result.needs_to_buy, 2.0);
        assert!(result.matches.is_empty());
        assert!(result.best_match.is_none());
        assert_eq!(f.scorer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.store.len().await, 0);
    }

    #[tokio::test]
    async fn exact_name_is_auto_and_covered() {
        let f = fixture(vec![pantry_item("p1", "chicken breast", 3.0, "lbs")]);
        let result = f
            .matcher
            .match_ingredient("u1", &request("chicken breast", 2.0, "lbs"))
            .await
            .unwrap();

        let best = result.best_match.as_ref().unwrap();
        assert!((best.confidence_score - 100.0).abs() < 1e-9);
        assert_eq!(result.match_tier, MatchTier::Auto);
        assert_eq!(result.needs_to_buy, 0.0);
        assert!(!result.is_partially_available());
    }

    #[tokio::test]
    async fn partial_availability() {
        let f = fixture(vec![pantry_item("p1", "chicken breast", 1.0, "lb")]);
        let result = f
            .matcher
            .match_ingredient("u1", &request("chicken breast", 2.0, "lbs"))
            .await
            .unwrap();

        assert_eq!(result.match_tier, MatchTier::Auto);
        assert!((result.needs_to_buy - 1.0).abs() < 1e-9);
        assert!(result.is_partially_available());
    }

    #[tokio::test]
    async fn converts_units_before_subtracting() {
        let f = fixture(vec![pantry_item("p1", "Flour", 500.0, "g")]);
        let result = f
            .matcher
            .match_ingredient("u1", &request("flour", 1.0, "kg"))
            .await
            .unwrap();
        assert!((result.needs_to_buy - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    #[traced_test]
    async fn unconvertible_unit_keeps_best_match_but_needs_everything() {
        let f = fixture(vec![pantry_item("p1", "milk", 2.0, "cup")]);
        let result = f
            .matcher
            .match_ingredient("u1", &request("milk", 300.0, "g"))
            .await
            .unwrap();

        assert_eq!(result.match_tier, MatchTier::Auto);
        assert_eq!(result.best_match.unwrap().pantry_item_id, "p1");
        assert_eq!(result.needs_to_buy, 300.0);
        assert!(logs_contain("no unit conversion"));
    }

    #[tokio::test]
    async fn weak_match_is_missing_but_listed() {
        let f = fixture(vec![pantry_item("p1", "paprika", 1.0, "jar")]);
        let result = f
            .matcher
            .match_ingredient("u1", &request("parmesan", 50.0, "g"))
            .await
            .unwrap();

        assert_eq!(result.match_tier, MatchTier::Missing);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.needs_to_buy, 50.0);
    }

    #[tokio::test]
    async fn candidates_are_capped_and_best_first() {
        let f = fixture(sample_pantry());
        let result = f
            .matcher
            .match_ingredient("u1", &request("Fresh Garlic", 2.0, "cloves"))
            .await
            .unwrap();

        assert_eq!(result.matches.len(), 5);
        assert_eq!(result.best_match.as_ref().unwrap().pantry_item_id, "p-garlic");
        assert!(result
            .matches
            .windows(2)
            .all(|w| w[0].confidence_score >= w[1].confidence_score));
        assert_eq!(result.needs_to_buy, 0.0);
    }

    #[tokio::test]
    async fn cache_hit_skips_scoring_and_pantry() {
        let f = fixture(sample_pantry());
        let req = request("whole milk", 0.5, "l");

        let first = f.matcher.match_ingredient("u1", &req).await.unwrap();
        let second = f.matcher.match_ingredient("u1", &req).await.unwrap();

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.matches, second.matches);
        assert_eq!(first.needs_to_buy, second.needs_to_buy);
        assert_eq!(f.scorer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.pantry.fetch_count(), 1);
    }

    #[tokio::test]
    async fn cache_key_is_the_normalized_name() {
        let f = fixture(sample_pantry());
        f.matcher
            .match_ingredient("u1", &request("Organic  EGGS", 6.0, "count"))
            .await
            .unwrap();
        let again = f
            .matcher
            .match_ingredient("u1", &request("eggs", 6.0, "pieces"))
            .await
            .unwrap();

        assert!(again.from_cache);
        assert!(f.store.entry("u1", "eggs").await.is_some());
        assert_eq!(again.needs_to_buy, 0.0);
    }

    #[tokio::test]
    async fn all_missing_results_are_cached() {
        let f = fixture(sample_pantry());
        let req = request("saffron", 1.0, "g");
        f.matcher.match_ingredient("u1", &req).await.unwrap();
        let again = f.matcher.match_ingredient("u1", &req).await.unwrap();

        assert!(again.from_cache);
        assert_eq!(again.match_tier, MatchTier::Missing);
        assert_eq!(f.scorer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_recompute() {
        let f = fixture(sample_pantry());
        let req = request("eggs", 2.0, "count");
        f.matcher.match_ingredient("u1", &req).await.unwrap();

        f.pantry.set_items("u1", Vec::new()).await;
        f.matcher.cache().invalidate_user("u1").await.unwrap();

        let after = f.matcher.match_ingredient("u1", &req).await.unwrap();
        assert!(!after.from_cache);
        assert_eq!(after.match_tier, MatchTier::Missing);
    }

    #[tokio::test]
    async fn pantry_failure_propagates() {
        let store = Arc::new(MemorySuggestionStore::new());
        let matcher = IngredientMatcher::new(
            &MatchingConfig::default(),
            Arc::new(FailingPantry),
            SuggestionCache::new(store, 24),
            Arc::new(EditRatioScorer),
        )
        .unwrap();

        let err = matcher
            .match_ingredient("u1", &request("rice", 1.0, "cup"))
            .await
            .unwrap_err();
        assert!(matches!(err, LarderError::PantrySource { .. }));
    }

    #[tokio::test]
    async fn cache_store_failure_propagates() {
        let store = Arc::new(MemorySuggestionStore::failing());
        let matcher = IngredientMatcher::new(
            &MatchingConfig::default(),
            Arc::new(MockPantry::with_items("u1", sample_pantry())),
            SuggestionCache::new(store, 24),
            Arc::new(EditRatioScorer),
        )
        .unwrap();

        let err = matcher
            .match_ingredient("u1", &request("rice", 1.0, "cup"))
            .await
            .unwrap_err();
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn invalid_requests_are_rejected() {
        let f = fixture(sample_pantry());
        for req in [
            request("   ", 1.0, "g"),
            request("salt", -1.0, "g"),
            request("salt", f64::NAN, "g"),
        ] {
            let err = f.matcher.match_ingredient("u1", &req).await.unwrap_err();
            assert!(matches!(err, LarderError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    #[traced_test]
    async fn oversized_pantry_is_truncated() {
        let items: Vec<PantryItem> = (0..8)
            .map(|i| pantry_item(&format!("p{i}"), &format!("item {i}"), 1.0, "g"))
            .collect();
        let config = MatchingConfig {
            top_k: 2,
            max_candidate_pool: 3,
            ..MatchingConfig::default()
        };
        let f = fixture_with(items, config);

        let snapshot = f.matcher.read_snapshot("u1").await.unwrap();
        assert_eq!(snapshot.len(), 3);
        assert!(logs_contain("pantry exceeds candidate pool"));

        let result = f
            .matcher
            .match_ingredient("u1", &request("item 7", 1.0, "g"))
            .await
            .unwrap();
        assert!(result.matches.iter().all(|m| m.pantry_item_id != "p7"));
    }

    #[test]
    fn zero_top_k_is_a_config_error() {
        let config = MatchingConfig {
            top_k: 0,
            ..MatchingConfig::default()
        };
        let result = IngredientMatcher::new(
            &config,
            Arc::new(MockPantry::new()),
            SuggestionCache::new(Arc::new(MemorySuggestionStore::new()), 24),
            Arc::new(EditRatioScorer),
        );
        assert!(matches!(result, Err(LarderError::Config(_))));
    }
}
