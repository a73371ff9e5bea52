// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock pantry sources.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use larder_core::{LarderError, PantryItem, PantrySource};

/// A pantry source holding fixed snapshots per user.
///
/// Every call to [`PantrySource::get_pantry_items`] bumps a counter so tests
/// can assert how often the matcher reached the pantry.
pub struct MockPantry {
    items: Arc<Mutex<HashMap<String, Vec<PantryItem>>>>,
    fetches: AtomicUsize,
}

impl MockPantry {
    /// An empty pantry for every user.
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(HashMap::new())),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A pantry pre-loaded with `items` for `user_id`.
    pub fn with_items(user_id: &str, items: Vec<PantryItem>) -> Self {
        let mut map = HashMap::new();
        map.insert(user_id.to_string(), items);
        Self {
            items: Arc::new(Mutex::new(map)),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Replace a user's snapshot.
    pub async fn set_items(&self, user_id: &str, items: Vec<PantryItem>) {
        self.items.lock().await.insert(user_id.to_string(), items);
    }

    /// Number of snapshot reads so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for MockPantry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PantrySource for MockPantry {
    async fn get_pantry_items(&self, user_id: &str) -> Result<Vec<PantryItem>, LarderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .items
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// A pantry source that is always unreachable.
#[derive(Default)]
pub struct FailingPantry;

#[async_trait]
impl PantrySource for FailingPantry {
    async fn get_pantry_items(&self, _user_id: &str) -> Result<Vec<PantryItem>, LarderError> {
        Err(LarderError::PantrySource {
            message: "pantry backend unreachable".to_string(),
            source: None,
        })
    }
}
