// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort recording of user decisions on suggestions.

use std::sync::Arc;

use tracing::{debug, warn};

use larder_core::{FeedbackAction, FeedbackLog, FeedbackRecord};

use crate::metrics;

/// Appends feedback records. Write failures are logged and counted, never returned.
pub struct FeedbackRecorder {
    log: Arc<dyn FeedbackLog>,
}

impl FeedbackRecorder {
    pub fn new(log: Arc<dyn FeedbackLog>) -> Self {
        Self { log }
    }

    pub async fn record_feedback(
        &self,
        user_id: &str,
        ingredient_name: &str,
        suggested_item: Option<&str>,
        actual_item: Option<&str>,
        action_taken: FeedbackAction,
        original_confidence: Option<f64>,
    ) {
        let record = FeedbackRecord::new(
            user_id.to_string(),
            ingredient_name.to_string(),
            suggested_item.map(str::to_string),
            actual_item.map(str::to_string),
            action_taken,
            original_confidence,
        );

        match self.log.append_feedback(&record).await {
            Ok(()) => debug!(
                user_id,
                ingredient = ingredient_name,
                action = %action_taken,
                "feedback recorded"
            ),
            Err(e) => {
                warn!(
                    user_id,
                    ingredient = ingredient_name,
                    action = %action_taken,
                    error = %e,
                    "failed to record feedback"
                );
                metrics::record_feedback_failure();
            }
        }
    }
}
