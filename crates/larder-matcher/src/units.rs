// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unit normalization and conversion.
//!
//! Weight converts through grams, volume through milliliters, and count-style
//! units are interchangeable 1:1. Anything else yields `None`: the caller
//! assumes the full quantity is still needed.

/// Conversion family of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCategory {
    Weight,
    Volume,
    Count,
}

/// Canonical unit name, category, and size in the category's base unit.
const UNITS: &[(&str, UnitCategory, f64)] = &[
    ("gram", UnitCategory::Weight, 1.0),
    ("kilogram", UnitCategory::Weight, 1000.0),
    ("pound", UnitCategory::Weight, 453.592),
    ("ounce", UnitCategory::Weight, 28.3495),
    ("milliliter", UnitCategory::Volume, 1.0),
    ("liter", UnitCategory::Volume, 1000.0),
    ("cup", UnitCategory::Volume, 236.588),
    ("tablespoon", UnitCategory::Volume, 14.7868),
    ("teaspoon", UnitCategory::Volume, 4.92892),
    ("fluid ounce", UnitCategory::Volume, 29.5735),
    ("pint", UnitCategory::Volume, 473.176),
    ("quart", UnitCategory::Volume, 946.353),
    ("gallon", UnitCategory::Volume, 3785.41),
    ("piece", UnitCategory::Count, 1.0),
    ("count", UnitCategory::Count, 1.0),
    ("item", UnitCategory::Count, 1.0),
    ("unit", UnitCategory::Count, 1.0),
    ("each", UnitCategory::Count, 1.0),
    ("whole", UnitCategory::Count, 1.0),
];

/// Abbreviations and spellings, keyed after trailing-`s` stripping.
const ALIASES: &[(&str, &str)] = &[
    ("g", "gram"),
    ("gm", "gram"),
    ("gr", "gram"),
    ("kg", "kilogram"),
    ("kilo", "kilogram"),
    ("lb", "pound"),
    ("oz", "ounce"),
    ("ml", "milliliter"),
    ("millilitre", "milliliter"),
    ("l", "liter"),
    ("litre", "liter"),
    ("c", "cup"),
    ("tbsp", "tablespoon"),
    ("tb", "tablespoon"),
    ("tsp", "teaspoon"),
    ("fl oz", "fluid ounce"),
    ("fl. oz", "fluid ounce"),
    ("fl. oz.", "fluid ounce"),
    ("floz", "fluid ounce"),
    ("pt", "pint"),
    ("qt", "quart"),
    ("gal", "gallon"),
    ("pc", "piece"),
    ("ct", "count"),
    ("ea", "each"),
];

/// Lower-case, trim, collapse whitespace, strip one trailing `s`, resolve aliases.
///
/// Unknown units come back in their cleaned form so two spellings of the same
/// unknown unit ("clove", "Cloves") still compare equal.
pub fn normalize_unit(unit: &str) -> String {
    let lower = unit.to_lowercase();
    let collapsed = lower.split_whitespace().collect::<Vec<_>>().join(" ");
    let stem = collapsed
        .strip_suffix('s')
        .filter(|s| !s.is_empty())
        .unwrap_or(&collapsed);

    ALIASES
        .iter()
        .find(|(alias, _)| *alias == stem)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| stem.to_string())
}

fn lookup(normalized: &str) -> Option<(UnitCategory, f64)> {
    UNITS
        .iter()
        .find(|(name, _, _)| *name == normalized)
        .map(|(_, category, factor)| (*category, *factor))
}

/// Category of a unit, if it is in a conversion table.
pub fn unit_category(unit: &str) -> Option<UnitCategory> {
    lookup(&normalize_unit(unit)).map(|(category, _)| category)
}

/// Convert `quantity` from one unit to another.
///
/// Returns `None` for cross-category or unrecognized pairs.
pub fn convert(quantity: f64, from_unit: &str, to_unit: &str) -> Option<f64> {
    let from = normalize_unit(from_unit);
    let to = normalize_unit(to_unit);
    if from == to {
        return Some(quantity);
    }

    let (from_category, from_factor) = lookup(&from)?;
    let (to_category, to_factor) = lookup(&to)?;
    if from_category != to_category {
        return None;
    }
    Some(quantity * from_factor / to_factor)
}
