// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory suggestion cache, feedback log, and generation log.
//!
//! Each store can be switched into a failing mode to exercise the matcher's
//! degraded paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use larder_core::types::parse_timestamp;
use larder_core::{
    CachedSuggestionSet, FeedbackLog, FeedbackRecord, GenerationLog, GenerationRecord,
    LarderError, MatchingStatistics, SuggestionStore,
};

fn unavailable(what: &str) -> LarderError {
    LarderError::Storage {
        source: format!("{what} unavailable").into(),
    }
}

/// Suggestion cache keyed by `(user_id, ingredient_name)`.
#[derive(Default)]
pub struct MemorySuggestionStore {
    entries: Mutex<HashMap<(String, String), CachedSuggestionSet>>,
    failing: AtomicBool,
    puts: AtomicUsize,
}

impl MemorySuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with a storage error.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Insert an entry directly, bypassing the counters.
    pub async fn seed(&self, set: CachedSuggestionSet) {
        self.entries
            .lock()
            .await
            .insert((set.user_id.clone(), set.ingredient_name.clone()), set);
    }

    pub async fn entry(&self, user_id: &str, ingredient_name: &str) -> Option<CachedSuggestionSet> {
        self.entries
            .lock()
            .await
            .get(&(user_id.to_string(), ingredient_name.to_string()))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl SuggestionStore for MemorySuggestionStore {
    async fn get_suggestions(
        &self,
        user_id: &str,
        ingredient_name: &str,
    ) -> Result<Option<CachedSuggestionSet>, LarderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("suggestion store"));
        }
        Ok(self.entry(user_id, ingredient_name).await)
    }

    async fn put_suggestions(&self, set: &CachedSuggestionSet) -> Result<(), LarderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("suggestion store"));
        }
        self.seed(set.clone()).await;
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn invalidate_user(&self, user_id: &str) -> Result<u64, LarderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("suggestion store"));
        }
        let mut entries = self.entries.lock().await;
        let mut touched = 0;
        for ((owner, _), set) in entries.iter_mut() {
            if owner == user_id && !set.is_stale {
                set.is_stale = true;
                touched += 1;
            }
        }
        Ok(touched)
    }
}

/// Feedback sink that keeps every appended record.
#[derive(Default)]
pub struct MemoryFeedbackLog {
    records: Mutex<Vec<FeedbackRecord>>,
    failing: AtomicBool,
}

impl MemoryFeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let log = Self::default();
        log.failing.store(true, Ordering::SeqCst);
        log
    }

    pub async fn records(&self) -> Vec<FeedbackRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl FeedbackLog for MemoryFeedbackLog {
    async fn append_feedback(&self, record: &FeedbackRecord) -> Result<(), LarderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("feedback log"));
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// Generation log that keeps records and averages them on demand.
#[derive(Default)]
pub struct MemoryGenerationLog {
    records: Mutex<Vec<GenerationRecord>>,
    failing: AtomicBool,
}

impl MemoryGenerationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let log = Self::default();
        log.failing.store(true, Ordering::SeqCst);
        log
    }

    pub async fn records(&self) -> Vec<GenerationRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl GenerationLog for MemoryGenerationLog {
    async fn record_generation(&self, record: &GenerationRecord) -> Result<(), LarderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("generation log"));
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn matching_statistics(
        &self,
        user_id: &str,
        days: u32,
    ) -> Result<MatchingStatistics, LarderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("generation log"));
        }
        let since = Utc::now() - Duration::days(i64::from(days));
        let records = self.records.lock().await;
        let window: Vec<&GenerationRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| parse_timestamp(&r.created_at).is_some_and(|at| at >= since))
            .collect();
        if window.is_empty() {
            return Ok(MatchingStatistics::default());
        }
        let n = window.len() as f64;
        let avg = |f: fn(&GenerationRecord) -> u32| {
            window.iter().map(|r| f64::from(f(r))).sum::<f64>() / n
        };
        Ok(MatchingStatistics {
            total_generations: window.len() as u64,
            avg_auto_matched: avg(|r| r.auto_matched),
            avg_confirm_needed: avg(|r| r.confirm_needed),
            avg_missing: avg(|r| r.missing),
        })
    }
}
