// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read interface onto the pantry subsystem.

use async_trait::async_trait;

use crate::error::LarderError;
use crate::types::PantryItem;

/// Source of pantry snapshots.
#[async_trait]
pub trait PantrySource: Send + Sync {
    /// Returns every active (non-consumed) item owned by `user_id`.
    ///
    /// An unreachable backend must surface as an error. Returning an empty
    /// list would be read as "the pantry is empty".
    async fn get_pantry_items(&self, user_id: &str) -> Result<Vec<PantryItem>, LarderError>;
}
