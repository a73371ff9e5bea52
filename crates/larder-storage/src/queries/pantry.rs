// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pantry item reads and the small write surface used to seed pantries.

use std::str::FromStr;

use chrono::NaiveDate;
use larder_core::{LarderError, PantryItem, StorageType};
use rusqlite::params;
use tracing::warn;

use crate::database::{map_tr_err, Database};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// List a user's active (non-consumed) items in insertion order.
pub async fn list_active_items(
    db: &Database,
    user_id: &str,
) -> Result<Vec<PantryItem>, LarderError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, quantity, unit, storage_type, expiration_date, category
                 FROM pantry_items WHERE user_id = ?1 AND is_consumed = 0
                 ORDER BY rowid",
            )?;
            let items = stmt
                .query_map(params![user_id], row_to_item)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}

/// Insert an item, or replace the user's row with the same id.
pub async fn upsert_item(
    db: &Database,
    user_id: &str,
    item: &PantryItem,
) -> Result<(), LarderError> {
    upsert_items(db, user_id, std::slice::from_ref(item)).await?;
    Ok(())
}

/// Upsert several items in one transaction. Either every item is written or none is.
///
/// Ids are scoped per user: the same id under another user is a different row.
pub async fn upsert_items(
    db: &Database,
    user_id: &str,
    items: &[PantryItem],
) -> Result<usize, LarderError> {
    let user_id = user_id.to_string();
    let items = items.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO pantry_items
                        (id, user_id, name, quantity, unit, storage_type, expiration_date, category)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                     ON CONFLICT(user_id, id) DO UPDATE SET
                        name = excluded.name,
                        quantity = excluded.quantity,
                        unit = excluded.unit,
                        storage_type = excluded.storage_type,
                        expiration_date = excluded.expiration_date,
                        category = excluded.category,
                        is_consumed = 0,
                        updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                )?;
                for item in &items {
                    stmt.execute(params![
                        item.id,
                        user_id,
                        item.name,
                        item.quantity,
                        item.unit,
                        item.storage_type.to_string(),
                        item.expiration_date.map(|d| d.format(DATE_FORMAT).to_string()),
                        item.category,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(items.len())
        })
        .await
        .map_err(map_tr_err)
}

/// Mark an item consumed. Returns false when no active item had that id.
pub async fn mark_consumed(
    db: &Database,
    user_id: &str,
    item_id: &str,
) -> Result<bool, LarderError> {
    let user_id = user_id.to_string();
    let item_id = item_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE pantry_items
                 SET is_consumed = 1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND user_id = ?2 AND is_consumed = 0",
                params![item_id, user_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<PantryItem> {
    let id: String = row.get(0)?;
    let raw_storage: String = row.get(4)?;
    let raw_expiration: Option<String> = row.get(5)?;

    let storage_type = StorageType::from_str(&raw_storage).unwrap_or_else(|_| {
        warn!(item_id = %id, storage_type = %raw_storage, "unknown storage type, assuming pantry");
        StorageType::Pantry
    });
    let expiration_date = raw_expiration.and_then(|raw| {
        NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .inspect_err(|_| {
                warn!(item_id = %id, expiration_date = %raw, "unreadable expiration date, ignoring");
            })
            .ok()
    });

    Ok(PantryItem {
        id,
        name: row.get(1)?,
        quantity: row.get(2)?,
        unit: row.get(3)?,
        storage_type,
        expiration_date,
        category: row.get(6)?,
    })
}
