// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end matching behavior against SQLite-backed collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use larder_config::LarderConfig;
use larder_core::{IngredientRequest, MatchTier, PantryItem};
use larder_matcher::{EditRatioScorer, MatchingService, ScoredCandidate, SimilarityScorer};
use larder_storage::{Database, SqliteStorage};
use larder_test_utils::fixtures::{pantry_item, request};
use larder_test_utils::{MemoryFeedbackLog, MemoryGenerationLog, MemorySuggestionStore, MockPantry};
use proptest::prelude::*;

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

struct Env {
    service: MatchingService,
    storage: Arc<SqliteStorage>,
    scorer: Arc<CountingScorer>,
}

async fn env(items: &[PantryItem]) -> Env {
    let config = LarderConfig::default();
    let db = Database::open_in_memory().await.unwrap();
    let storage = Arc::new(SqliteStorage::with_database(config.storage.clone(), db));
    for item in items {
        storage.add_pantry_item("u1", item).await.unwrap();
    }
    let scorer = Arc::new(CountingScorer::default());
    let service = MatchingService::builder(&config)
        .pantry(storage.clone())
        .suggestions(storage.clone())
        .feedback(storage.clone())
        .generations(storage.clone())
        .scorer(scorer.clone())
        .build()
        .unwrap();
    Env {
        service,
        storage,
        scorer,
    }
}

#[tokio::test]
async fn empty_pantry_needs_everything() {
    let env = env(&[]).await;
    let result = env
        .service
        .match_ingredient_to_pantry("u1", "chicken breast", 2.0, "lbs")
        .await
        .unwrap();

    assert_eq!(result.match_tier, MatchTier::Missing);
    assert_eq!(result.needs_to_buy, 2.0);
    assert!(result.matches.is_empty());
}

#[tokio::test]
async fn exact_name_auto_match() {
    let env = env(&[pantry_item("p1", "chicken breast", 3.0, "lbs")]).await;
    let result = env
        .service
        .match_ingredient_to_pantry("u1", "chicken breast", 2.0, "lbs")
        .await
        .unwrap();

    let best = result.best_match.unwrap();
    assert!((best.confidence_score - 100.0).abs() < 1e-9);
    assert_eq!(result.match_tier, MatchTier::Auto);
    assert_eq!(result.needs_to_buy, 0.0);
}

#[tokio::test]
async fn partial_availability() {
    let env = env(&[pantry_item("p1", "chicken breast", 1.0, "lbs")]).await;
    let result = env
        .service
        .match_ingredient_to_pantry("u1", "chicken breast", 2.0, "lbs")
        .await
        .unwrap();

    assert_eq!(result.match_tier, MatchTier::Auto);
    assert!((result.needs_to_buy - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn batch_preserves_order_and_counts_add_up() {
    let env = env(&[
        pantry_item("p1", "Olive Oil", 500.0, "ml"),
        pantry_item("p2", "Spaghetti", 1.0, "lb"),
        pantry_item("p3", "Garlic", 6.0, "cloves"),
    ])
    .await;
    let ingredients = vec![
        request("spaghetti", 8.0, "oz"),
        request("anchovies", 4.0, "piece"),
        request("olive oil", 0.25, "cup"),
        request("fresh garlic", 3.0, "clove"),
        request("lemon", 1.0, "whole"),
    ];

    let summary = env
        .service
        .batch_match_ingredients("u1", &ingredients, None)
        .await
        .unwrap();

    let names: Vec<&str> = summary
        .results
        .iter()
        .map(|r| r.ingredient_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["spaghetti", "anchovies", "olive oil", "fresh garlic", "lemon"]
    );
    assert_eq!(
        summary.auto_matched + summary.confirm_needed + summary.missing,
        summary.total()
    );
    assert_eq!(summary.results[0].needs_to_buy, 0.0);
    assert_eq!(summary.results[3].needs_to_buy, 0.0);

    let stats = env.service.get_matching_statistics("u1", 7).await.unwrap();
    assert_eq!(stats.total_generations, 1);
    assert!(
        (stats.avg_auto_matched + stats.avg_confirm_needed + stats.avg_missing - 5.0).abs() < 1e-9
    );
}

#[tokio::test]
async fn cache_hit_avoids_rescoring() {
    let env = env(&[
        pantry_item("p1", "Whole Milk", 1.0, "gallon"),
        pantry_item("p2", "Butter", 250.0, "g"),
    ])
    .await;

    let first = env
        .service
        .match_ingredient_to_pantry("u1", "milk", 2.0, "cup")
        .await
        .unwrap();
    let second = env
        .service
        .match_ingredient_to_pantry("u1", "milk", 2.0, "cup")
        .await
        .unwrap();

    assert_eq!(env.scorer.calls.load(Ordering::SeqCst), 1);
    assert!(second.from_cache);
    assert_eq!(first.matches, second.matches);
    assert_eq!(first.best_match, second.best_match);
}

#[tokio::test]
async fn consuming_an_item_and_invalidating_updates_matches() {
    let env = env(&[pantry_item("p1", "Eggs", 12.0, "count")]).await;
    let before = env
        .service
        .match_ingredient_to_pantry("u1", "eggs", 2.0, "count")
        .await
        .unwrap();
    assert_eq!(before.needs_to_buy, 0.0);

    assert!(env.storage.consume_pantry_item("u1", "p1").await.unwrap());
    env.service.invalidate_pantry_cache("u1").await.unwrap();

    let after = env
        .service
        .match_ingredient_to_pantry("u1", "eggs", 2.0, "count")
        .await
        .unwrap();
    assert_eq!(after.match_tier, MatchTier::Missing);
    assert_eq!(after.needs_to_buy, 2.0);
    assert_eq!(env.scorer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn feedback_lands_in_storage() {
    let env = env(&[]).await;
    env.service
        .record_user_feedback(
            "u1",
            "parmesan",
            Some("Parmigiano"),
            None,
            larder_core::FeedbackAction::Rejected,
            Some(71.0),
        )
        .await;
    let records = env.storage.recent_feedback("u1", 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].ingredient_name, "parmesan");
}

const NAMES: &[&str] = &["chicken breast", "chicken", "rice", "milk", "whole milk", "eggs"];
const UNITS: &[&str] = &["g", "kg", "lb", "oz", "cup", "ml", "count", "clove", "pinch"];

fn pantry_strategy() -> impl Strategy<Value = Vec<PantryItem>> {
    prop::collection::vec(
        (
            prop::sample::select(NAMES),
            0.0f64..5000.0,
            prop::sample::select(UNITS),
        ),
        0..6,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, qty, unit))| pantry_item(&format!("p{i}"), name, qty, unit))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn needs_to_buy_stays_within_bounds(
        items in pantry_strategy(),
        name in prop::sample::select(NAMES),
        quantity in 0.0f64..5000.0,
        unit in prop::sample::select(UNITS),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let result = runtime.block_on(async {
            let service = MatchingService::builder(&LarderConfig::default())
                .pantry(Arc::new(MockPantry::with_items("u1", items)))
                .suggestions(Arc::new(MemorySuggestionStore::new()))
                .feedback(Arc::new(MemoryFeedbackLog::new()))
                .generations(Arc::new(MemoryGenerationLog::new()))
                .build()
                .unwrap();
            service
                .match_ingredient_to_pantry("u1", name, quantity, unit)
                .await
                .unwrap()
        });

        prop_assert!(result.needs_to_buy >= 0.0);
        prop_assert!(result.needs_to_buy <= result.required_quantity);
        prop_assert_eq!(result.best_match.is_none(), result.matches.is_empty());
    }

    #[test]
    fn batch_counts_always_sum_to_total(
        items in pantry_strategy(),
        names in prop::collection::vec(prop::sample::select(NAMES), 0..8),
        threshold in 0.0f64..100.0,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let ingredients: Vec<IngredientRequest> =
            names.iter().map(|n| request(n, 1.0, "count")).collect();
        let summary = runtime.block_on(async {
            let service = MatchingService::builder(&LarderConfig::default())
                .pantry(Arc::new(MockPantry::with_items("u1", items)))
                .suggestions(Arc::new(MemorySuggestionStore::new()))
                .feedback(Arc::new(MemoryFeedbackLog::new()))
                .generations(Arc::new(MemoryGenerationLog::new()))
                .build()
                .unwrap();
            service
                .batch_match_ingredients("u1", &ingredients, Some(threshold))
                .await
                .unwrap()
        });

        prop_assert_eq!(summary.total(), ingredients.len());
        prop_assert_eq!(
            summary.auto_matched + summary.confirm_needed + summary.missing,
            summary.total()
        );
    }
}
