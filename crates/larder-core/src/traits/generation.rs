// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of shopping-list generation counts.

use async_trait::async_trait;

use crate::error::LarderError;
use crate::types::{GenerationRecord, MatchingStatistics};

/// Log of generation summaries and aggregate reads over it.
#[async_trait]
pub trait GenerationLog: Send + Sync {
    async fn record_generation(&self, record: &GenerationRecord) -> Result<(), LarderError>;

    /// Averages over the generations `user_id` ran in the last `days` days.
    async fn matching_statistics(
        &self,
        user_id: &str,
        days: u32,
    ) -> Result<MatchingStatistics, LarderError>;
}
