// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only feedback log.

use std::str::FromStr;

use larder_core::{FeedbackAction, FeedbackRecord, LarderError};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// Append one feedback record.
pub async fn insert_feedback(db: &Database, record: &FeedbackRecord) -> Result<(), LarderError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO matching_feedback
                    (id, user_id, ingredient_name, suggested_item, actual_item,
                     action_taken, original_confidence, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.user_id,
                    record.ingredient_name,
                    record.suggested_item,
                    record.actual_item,
                    record.action_taken.to_string(),
                    record.original_confidence,
                    record.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent feedback for a user, newest first.
pub async fn list_feedback(
    db: &Database,
    user_id: &str,
    limit: usize,
) -> Result<Vec<FeedbackRecord>, LarderError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, ingredient_name, suggested_item, actual_item,
                        action_taken, original_confidence, created_at
                 FROM matching_feedback WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let records = stmt
                .query_map(params![user_id, limit as i64], |row| {
                    let action: String = row.get(5)?;
                    Ok(FeedbackRecord {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        ingredient_name: row.get(2)?,
                        suggested_item: row.get(3)?,
                        actual_item: row.get(4)?,
                        action_taken: FeedbackAction::from_str(&action)
                            .unwrap_or(FeedbackAction::Rejected),
                        original_confidence: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })
        .await
        .map_err(map_tr_err)
}
