// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-bounded suggestion cache over a [`SuggestionStore`].
//!
//! Entries are keyed by `(user_id, normalized ingredient name)` and hold the
//! full candidate list, including all-missing lists. Store failures propagate;
//! unreadable payloads are logged and treated as misses.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use larder_config::model::CacheConfig;
use larder_core::{CachedSuggestionSet, LarderError, MatchCandidate, SuggestionStore};

use crate::metrics::{record_cache_lookup, CacheLookup};

pub struct SuggestionCache {
    store: Arc<dyn SuggestionStore>,
    ttl: Duration,
    enabled: bool,
}

impl SuggestionCache {
    pub fn new(store: Arc<dyn SuggestionStore>, ttl_hours: u32) -> Self {
        Self {
            store,
            ttl: Duration::hours(i64::from(ttl_hours)),
            enabled: true,
        }
    }

    pub fn from_config(store: Arc<dyn SuggestionStore>, config: &CacheConfig) -> Self {
        Self {
            enabled: config.enabled,
            ..Self::new(store, config.ttl_hours)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached candidates for a key, or `None` when the entry is absent,
    /// expired, stale, or unreadable.
    pub async fn lookup(
        &self,
        user_id: &str,
        ingredient_name: &str,
    ) -> Result<Option<Vec<MatchCandidate>>, LarderError> {
        if !self.enabled {
            record_cache_lookup(CacheLookup::Disabled);
            return Ok(None);
        }

        let Some(set) = self.store.get_suggestions(user_id, ingredient_name).await? else {
            debug!(user_id, ingredient = ingredient_name, "suggestion cache miss");
            record_cache_lookup(CacheLookup::Miss);
            return Ok(None);
        };

        if !set.is_fresh(Utc::now()) {
            debug!(
                user_id,
                ingredient = ingredient_name,
                is_stale = set.is_stale,
                expires_at = %set.expires_at,
                "suggestion cache entry expired"
            );
            record_cache_lookup(CacheLookup::Stale);
            return Ok(None);
        }

        match serde_json::from_str::<Vec<MatchCandidate>>(&set.candidates_json) {
            Ok(candidates) => {
                debug!(
                    user_id,
                    ingredient = ingredient_name,
                    candidates = candidates.len(),
                    "suggestion cache hit"
                );
                record_cache_lookup(CacheLookup::Hit);
                Ok(Some(candidates))
            }
            Err(e) => {
                warn!(
                    user_id,
                    ingredient = ingredient_name,
                    error = %e,
                    "unreadable cached suggestions, recomputing"
                );
                record_cache_lookup(CacheLookup::Corrupt);
                Ok(None)
            }
        }
    }

    /// Write (or overwrite) the candidate list for a key with a fresh expiry.
    pub async fn store(
        &self,
        user_id: &str,
        ingredient_name: &str,
        candidates: &[MatchCandidate],
    ) -> Result<(), LarderError> {
        if !self.enabled {
            return Ok(());
        }

        let candidates_json = serde_json::to_string(candidates)
            .map_err(|e| LarderError::Internal(format!("serialize candidates: {e}")))?;
        let computed_at = Utc::now();
        let set = CachedSuggestionSet {
            user_id: user_id.to_string(),
            ingredient_name: ingredient_name.to_string(),
            candidates_json,
            computed_at,
            expires_at: computed_at + self.ttl,
            is_stale: false,
        };
        self.store.put_suggestions(&set).await?;
        debug!(
            user_id,
            ingredient = ingredient_name,
            candidates = candidates.len(),
            "suggestions cached"
        );
        Ok(())
    }

    /// Mark every cached entry for a user stale after a pantry change.
    pub async fn invalidate_user(&self, user_id: &str) -> Result<u64, LarderError> {
        let touched = self.store.invalidate_user(user_id).await?;
        debug!(user_id, touched, "suggestion cache invalidated");
        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::{MatchTier, StorageType};
    use larder_test_utils::MemorySuggestionStore;

    fn candidate(name: &str, score: f64) -> MatchCandidate {
        MatchCandidate {
            ingredient_name: "milk".to_string(),
            pantry_item_id: format!("p-{name}"),
            pantry_item_name: name.to_string(),
            available_quantity: 1.0,
            available_unit: "l".to_string(),
            confidence_score: score,
            match_tier: MatchTier::Confirm,
            storage_type: StorageType::Fridge,
            expiration_date: None,
        }
    }

    fn cache(store: &Arc<MemorySuggestionStore>) -> SuggestionCache {
        SuggestionCache::new(store.clone(), 24)
    }

    #[tokio::test]
    async fn store_then_lookup_round_trips() {
        let store = Arc::new(MemorySuggestionStore::new());
        let cache = cache(&store);
        let candidates = vec![candidate("whole milk", 80.0), candidate("oat milk", 72.0)];

        assert!(cache.lookup("u1", "milk").await.unwrap().is_none());
        cache.store("u1", "milk", &candidates).await.unwrap();
        assert_eq!(cache.lookup("u1", "milk").await.unwrap(), Some(candidates));

        let entry = store.entry("u1", "milk").await.unwrap();
        assert_eq!(entry.expires_at - entry.computed_at, Duration::hours(24));
    }

    #[tokio::test]
    async fn empty_candidate_lists_are_cached() {
        let store = Arc::new(MemorySuggestionStore::new());
        let cache = cache(&store);
        cache.store("u1", "saffron", &[]).await.unwrap();
        assert_eq!(cache.lookup("u1", "saffron").await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn expired_and_stale_entries_miss() {
        let store = Arc::new(MemorySuggestionStore::new());
        let cache = cache(&store);
        let now = Utc::now();
        store
            .seed(CachedSuggestionSet {
                user_id: "u1".to_string(),
                ingredient_name: "eggs".to_string(),
                candidates_json: "[]".to_string(),
                computed_at: now - Duration::hours(25),
                expires_at: now - Duration::hours(1),
                is_stale: false,
            })
            .await;
        assert!(cache.lookup("u1", "eggs").await.unwrap().is_none());

        cache.store("u1", "flour", &[]).await.unwrap();
        assert_eq!(cache.invalidate_user("u1").await.unwrap(), 1);
        assert!(cache.lookup("u1", "flour").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_payload_is_a_miss() {
        let store = Arc::new(MemorySuggestionStore::new());
        let cache = cache(&store);
        let now = Utc::now();
        store
            .seed(CachedSuggestionSet {
                user_id: "u1".to_string(),
                ingredient_name: "rice".to_string(),
                candidates_json: "{not json".to_string(),
                computed_at: now,
                expires_at: now + Duration::hours(1),
                is_stale: false,
            })
            .await;
        assert!(cache.lookup("u1", "rice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let store = Arc::new(MemorySuggestionStore::failing());
        let cache = cache(&store);
        assert!(cache.lookup("u1", "rice").await.unwrap_err().is_infrastructure());
        assert!(cache.store("u1", "rice", &[]).await.unwrap_err().is_infrastructure());
    }

    #[tokio::test]
    async fn disabled_cache_never_touches_the_store() {
        let store = Arc::new(MemorySuggestionStore::failing());
        let cache = SuggestionCache::from_config(
            store.clone(),
            &CacheConfig {
                enabled: false,
                ttl_hours: 24,
            },
        );
        assert!(!cache.is_enabled());
        assert!(cache.lookup("u1", "rice").await.unwrap().is_none());
        cache.store("u1", "rice", &[]).await.unwrap();
    }
}
