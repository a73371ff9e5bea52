// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for common test records.

use larder_core::{FeedbackAction, FeedbackRecord, IngredientRequest, PantryItem, StorageType};

/// A pantry item in dry storage with no expiration.
pub fn pantry_item(id: &str, name: &str, quantity: f64, unit: &str) -> PantryItem {
    PantryItem {
        id: id.to_string(),
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        storage_type: StorageType::Pantry,
        expiration_date: None,
        category: "general".to_string(),
    }
}

pub fn request(name: &str, quantity: f64, unit: &str) -> IngredientRequest {
    IngredientRequest::new(name, quantity, unit)
}

/// An accepted-suggestion feedback record.
pub fn feedback(user_id: &str, ingredient_name: &str) -> FeedbackRecord {
    FeedbackRecord::new(
        user_id.to_string(),
        ingredient_name.to_string(),
        Some(ingredient_name.to_string()),
        None,
        FeedbackAction::Accepted,
        Some(95.0),
    )
}

/// A small mixed pantry used across matcher tests.
pub fn sample_pantry() -> Vec<PantryItem> {
    vec![
        pantry_item("p-chicken", "Chicken Breast", 3.0, "lbs"),
        pantry_item("p-milk", "Whole Milk", 1.0, "l"),
        pantry_item("p-eggs", "Eggs", 12.0, "count"),
        pantry_item("p-flour", "All Purpose Flour", 1000.0, "g"),
        pantry_item("p-garlic", "Garlic", 5.0, "clove"),
    ]
}
