// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyed persistence for cached match candidates.

use async_trait::async_trait;

use crate::error::LarderError;
use crate::types::CachedSuggestionSet;

/// Store for [`CachedSuggestionSet`]s keyed by `(user_id, ingredient_name)`.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Fetch the entry for a key, fresh or not.
    async fn get_suggestions(
        &self,
        user_id: &str,
        ingredient_name: &str,
    ) -> Result<Option<CachedSuggestionSet>, LarderError>;

    /// Insert or overwrite the entry for the set's key.
    async fn put_suggestions(&self, set: &CachedSuggestionSet) -> Result<(), LarderError>;

    /// Mark all of a user's entries stale. Returns the number of entries touched.
    async fn invalidate_user(&self, user_id: &str) -> Result<u64, LarderError>;
}
