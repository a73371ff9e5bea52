// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command handlers. Each returns the JSON value `main` prints.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::info;

use larder_config::LarderConfig;
use larder_core::{IngredientRequest, LarderError, PantryItem, PantrySource};
use larder_matcher::MatchingService;
use larder_storage::SqliteStorage;

use crate::{CacheCommands, Commands, ConfigCommands, PantryCommands};

pub async fn run(config: &LarderConfig, command: Commands) -> Result<Value, LarderError> {
    if let Commands::Config {
        action: ConfigCommands::Check,
    } = command
    {
        return Ok(json!({ "valid": true, "config": config }));
    }

    let storage = Arc::new(SqliteStorage::open(config.storage.clone()).await?);
    let service = MatchingService::with_store(config, storage.clone())?;
    let output = dispatch(&service, &storage, command).await;
    storage.close().await?;
    output
}

async fn dispatch(
    service: &MatchingService,
    storage: &SqliteStorage,
    command: Commands,
) -> Result<Value, LarderError> {
    match command {
        Commands::Match {
            user,
            name,
            quantity,
            unit,
        } => {
            let result = service
                .match_ingredient_to_pantry(&user, &name, quantity, &unit)
                .await?;
            to_value(&result)
        }
        Commands::Batch {
            user,
            file,
            auto_confirm_threshold,
        } => {
            let ingredients: Vec<IngredientRequest> = read_json(&file)?;
            let summary = service
                .batch_match_ingredients(&user, &ingredients, auto_confirm_threshold)
                .await?;
            to_value(&summary)
        }
        Commands::Feedback {
            user,
            ingredient,
            action,
            suggested,
            actual,
            confidence,
        } => {
            service
                .record_user_feedback(
                    &user,
                    &ingredient,
                    suggested.as_deref(),
                    actual.as_deref(),
                    action,
                    confidence,
                )
                .await;
            Ok(json!({ "recorded": true }))
        }
        Commands::Stats { user, days } => {
            let stats = service.get_matching_statistics(&user, days).await?;
            to_value(&stats)
        }
        Commands::Pantry { action } => pantry(service, storage, action).await,
        Commands::Cache {
            action: CacheCommands::Purge,
        } => {
            let deleted = storage.purge_expired_suggestions().await?;
            Ok(json!({ "deleted": deleted }))
        }
        Commands::Config { .. } => Err(LarderError::Internal(
            "config commands run without storage".to_string(),
        )),
    }
}

async fn pantry(
    service: &MatchingService,
    storage: &SqliteStorage,
    action: PantryCommands,
) -> Result<Value, LarderError> {
    match action {
        PantryCommands::Import { user, file } => {
            let items: Vec<PantryItem> = read_json(&file)?;
            // All-or-nothing: a failed import leaves the pantry and its cache untouched.
            let imported = storage.add_pantry_items(&user, &items).await?;
            let invalidated = service.invalidate_pantry_cache(&user).await?;
            info!(user_id = %user, imported, invalidated, "pantry imported");
            Ok(json!({ "imported": imported, "invalidated": invalidated }))
        }
        PantryCommands::List { user } => {
            let items = storage.get_pantry_items(&user).await?;
            to_value(&items)
        }
        PantryCommands::Consume { user, item } => {
            let consumed = storage.consume_pantry_item(&user, &item).await?;
            let invalidated = if consumed {
                service.invalidate_pantry_cache(&user).await?
            } else {
                0
            };
            Ok(json!({ "consumed": consumed, "invalidated": invalidated }))
        }
    }
}

/// Read a JSON document from `path`, or stdin when `path` is `-`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LarderError> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| LarderError::InvalidInput(format!("cannot read stdin: {e}")))?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            LarderError::InvalidInput(format!("cannot read {}: {e}", path.display()))
        })?
    };
    serde_json::from_str(&content)
        .map_err(|e| LarderError::InvalidInput(format!("{}: {e}", path.display())))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, LarderError> {
    serde_json::to_value(value).map_err(|e| LarderError::Internal(e.to_string()))
}
