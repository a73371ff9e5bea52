// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suggestion cache rows keyed by `(user_id, ingredient_name)`.

use chrono::{DateTime, Utc};
use larder_core::types::{format_timestamp, parse_timestamp};
use larder_core::{CachedSuggestionSet, LarderError};
use rusqlite::params;
use tracing::warn;

use crate::database::{map_tr_err, Database};

/// Fetch the cache row for a key regardless of freshness.
///
/// Rows whose timestamps cannot be parsed come back stale so callers recompute.
pub async fn get_suggestions(
    db: &Database,
    user_id: &str,
    ingredient_name: &str,
) -> Result<Option<CachedSuggestionSet>, LarderError> {
    let user_id = user_id.to_string();
    let ingredient_name = ingredient_name.to_string();
    let row = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, ingredient_name, candidates_json, computed_at, expires_at, is_stale
                 FROM ingredient_suggestions WHERE user_id = ?1 AND ingredient_name = ?2",
            )?;
            let result = stmt.query_row(params![user_id, ingredient_name], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, bool>(5)?,
                ))
            });
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;

    Ok(row.map(
        |(user_id, ingredient_name, candidates_json, computed_at, expires_at, is_stale)| {
            let computed = parse_timestamp(&computed_at);
            let expires = parse_timestamp(&expires_at);
            if computed.is_none() || expires.is_none() {
                warn!(
                    user_id = %user_id,
                    ingredient = %ingredient_name,
                    "unreadable suggestion timestamps, treating entry as stale"
                );
            }
            CachedSuggestionSet {
                is_stale: is_stale || computed.is_none() || expires.is_none(),
                computed_at: computed.unwrap_or(DateTime::<Utc>::MIN_UTC),
                expires_at: expires.unwrap_or(DateTime::<Utc>::MIN_UTC),
                user_id,
                ingredient_name,
                candidates_json,
            }
        },
    ))
}

/// Insert or overwrite the row for the set's key. Last writer wins.
pub async fn upsert_suggestions(
    db: &Database,
    set: &CachedSuggestionSet,
) -> Result<(), LarderError> {
    let user_id = set.user_id.clone();
    let ingredient_name = set.ingredient_name.clone();
    let candidates_json = set.candidates_json.clone();
    let computed_at = format_timestamp(&set.computed_at);
    let expires_at = format_timestamp(&set.expires_at);
    let is_stale = set.is_stale;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO ingredient_suggestions
                    (user_id, ingredient_name, candidates_json, computed_at, expires_at, is_stale)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id, ingredient_name) DO UPDATE SET
                    candidates_json = excluded.candidates_json,
                    computed_at = excluded.computed_at,
                    expires_at = excluded.expires_at,
                    is_stale = excluded.is_stale",
                params![
                    user_id,
                    ingredient_name,
                    candidates_json,
                    computed_at,
                    expires_at,
                    is_stale
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Mark every entry of a user stale. Returns the number of rows changed.
pub async fn invalidate_user(db: &Database, user_id: &str) -> Result<u64, LarderError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE ingredient_suggestions SET is_stale = 1
                 WHERE user_id = ?1 AND is_stale = 0",
                params![user_id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete rows that are stale or expired as of `now`.
pub async fn purge_expired(db: &Database, now: DateTime<Utc>) -> Result<u64, LarderError> {
    let now = format_timestamp(&now);
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM ingredient_suggestions WHERE is_stale = 1 OR expires_at <= ?1",
                params![now],
            )?;
            Ok(deleted as u64)
        })
        .await
        .map_err(map_tr_err)
}
