// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation summary records and the statistics read over them.

use chrono::{Duration, Utc};
use larder_core::types::format_timestamp;
use larder_core::{GenerationRecord, LarderError, MatchingStatistics};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// Persist the counts of one generation.
pub async fn insert_generation(
    db: &Database,
    record: &GenerationRecord,
) -> Result<(), LarderError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO shopping_generations
                    (id, user_id, total_ingredients, auto_matched, confirm_needed, missing, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.user_id,
                    record.total_ingredients,
                    record.auto_matched,
                    record.confirm_needed,
                    record.missing,
                    record.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Averages over the generations of the last `days` days. No rows yields zeros.
pub async fn matching_statistics(
    db: &Database,
    user_id: &str,
    days: u32,
) -> Result<MatchingStatistics, LarderError> {
    let user_id = user_id.to_string();
    let since = format_timestamp(&(Utc::now() - Duration::days(i64::from(days))));
    db.connection()
        .call(move |conn| {
            let stats = conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(AVG(auto_matched), 0.0),
                        COALESCE(AVG(confirm_needed), 0.0),
                        COALESCE(AVG(missing), 0.0)
                 FROM shopping_generations
                 WHERE user_id = ?1 AND created_at >= ?2",
                params![user_id, since],
                |row| {
                    Ok(MatchingStatistics {
                        total_generations: row.get::<_, i64>(0)? as u64,
                        avg_auto_matched: row.get(1)?,
                        avg_confirm_needed: row.get(2)?,
                        avg_missing: row.get(3)?,
                    })
                },
            )?;
            Ok(stats)
        })
        .await
        .map_err(map_tr_err)
}
