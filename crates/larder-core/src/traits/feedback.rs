// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only feedback log.

use async_trait::async_trait;

use crate::error::LarderError;
use crate::types::FeedbackRecord;

/// Sink for user accept/reject/correct decisions.
#[async_trait]
pub trait FeedbackLog: Send + Sync {
    /// Append one record. Records are never updated or deleted.
    async fn append_feedback(&self, record: &FeedbackRecord) -> Result<(), LarderError>;
}
