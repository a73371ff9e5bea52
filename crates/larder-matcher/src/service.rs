// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The matching service: the entry point the rest of an application calls.
//!
//! Built once at startup from [`LarderConfig`] and explicit collaborators,
//! then shared across requests.

use std::sync::Arc;

use larder_config::LarderConfig;
use larder_core::{
    FeedbackAction, FeedbackLog, GenerationLog, GenerationSummary, IngredientRequest,
    LarderError, MatchingResult, MatchingStatistics, PantrySource, SuggestionStore,
};

use crate::batch::BatchOrchestrator;
use crate::cache::SuggestionCache;
use crate::feedback::FeedbackRecorder;
use crate::matcher::IngredientMatcher;
use crate::similarity::{EditRatioScorer, SimilarityScorer};

/// Ingredient-to-pantry matching with caching, batch summaries, and feedback.
pub struct MatchingService {
    matcher: Arc<IngredientMatcher>,
    batch: BatchOrchestrator,
    feedback: FeedbackRecorder,
    generations: Arc<dyn GenerationLog>,
}

impl MatchingService {
    pub fn builder(config: &LarderConfig) -> MatchingServiceBuilder {
        MatchingServiceBuilder::new(config)
    }

    /// Build a service whose collaborators are all backed by one store.
    pub fn with_store<S>(config: &LarderConfig, store: Arc<S>) -> Result<Self, LarderError>
    where
        S: PantrySource + SuggestionStore + FeedbackLog + GenerationLog + 'static,
    {
        Self::builder(config)
            .pantry(store.clone())
            .suggestions(store.clone())
            .feedback(store.clone())
            .generations(store)
            .build()
    }

    pub async fn match_ingredient_to_pantry(
        &self,
        user_id: &str,
        ingredient_name: &str,
        quantity: f64,
        unit: &str,
    ) -> Result<MatchingResult, LarderError> {
        let request = IngredientRequest::new(ingredient_name, quantity, unit);
        self.matcher.match_ingredient(user_id, &request).await
    }

    pub async fn batch_match_ingredients(
        &self,
        user_id: &str,
        ingredients: &[IngredientRequest],
        auto_confirm_threshold: Option<f64>,
    ) -> Result<GenerationSummary, LarderError> {
        self.batch
            .batch_match(user_id, ingredients, auto_confirm_threshold)
            .await
    }

    pub async fn record_user_feedback(
        &self,
        user_id: &str,
        ingredient_name: &str,
        suggested_item: Option<&str>,
        actual_item: Option<&str>,
        action_taken: FeedbackAction,
        original_confidence: Option<f64>,
    ) {
        self.feedback
            .record_feedback(
                user_id,
                ingredient_name,
                suggested_item,
                actual_item,
                action_taken,
                original_confidence,
            )
            .await;
    }

    pub async fn get_matching_statistics(
        &self,
        user_id: &str,
        days: u32,
    ) -> Result<MatchingStatistics, LarderError> {
        self.generations.matching_statistics(user_id, days).await
    }

    /// Drop a user's cached suggestions after their pantry changed.
    pub async fn invalidate_pantry_cache(&self, user_id: &str) -> Result<u64, LarderError> {
        self.matcher.cache().invalidate_user(user_id).await
    }
}

/// Builder for [`MatchingService`]. Every collaborator except the scorer is required.
pub struct MatchingServiceBuilder {
    config: LarderConfig,
    pantry: Option<Arc<dyn PantrySource>>,
    suggestions: Option<Arc<dyn SuggestionStore>>,
    feedback: Option<Arc<dyn FeedbackLog>>,
    generations: Option<Arc<dyn GenerationLog>>,
    scorer: Option<Arc<dyn SimilarityScorer>>,
}

impl MatchingServiceBuilder {
    fn new(config: &LarderConfig) -> Self {
        Self {
            config: config.clone(),
            pantry: None,
            suggestions: None,
            feedback: None,
            generations: None,
            scorer: None,
        }
    }

    pub fn pantry(mut self, pantry: Arc<dyn PantrySource>) -> Self {
        self.pantry = Some(pantry);
        self
    }

    pub fn suggestions(mut self, suggestions: Arc<dyn SuggestionStore>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    pub fn feedback(mut self, feedback: Arc<dyn FeedbackLog>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn generations(mut self, generations: Arc<dyn GenerationLog>) -> Self {
        self.generations = Some(generations);
        self
    }

    /// Replace the default edit-ratio scorer.
    pub fn scorer(mut self, scorer: Arc<dyn SimilarityScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn build(self) -> Result<MatchingService, LarderError> {
        let pantry = required(self.pantry, "pantry source")?;
        let suggestions = required(self.suggestions, "suggestion store")?;
        let feedback = required(self.feedback, "feedback log")?;
        let generations = required(self.generations, "generation log")?;
        let scorer = self.scorer.unwrap_or_else(|| Arc::new(EditRatioScorer));

        let cache = SuggestionCache::from_config(suggestions, &self.config.cache);
        let matcher = Arc::new(IngredientMatcher::new(
            &self.config.matching,
            pantry,
            cache,
            scorer,
        )?);
        let batch = BatchOrchestrator::new(matcher.clone())
            .with_generation_log(generations.clone())
            .with_auto_confirm_threshold(self.config.matching.auto_confirm_threshold);

        Ok(MatchingService {
            matcher,
            batch,
            feedback: FeedbackRecorder::new(feedback),
            generations,
        })
    }
}

fn required<T>(value: Option<T>, what: &str) -> Result<T, LarderError> {
    value.ok_or_else(|| LarderError::Config(format!("matching service needs a {what}")))
}
