// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Larder.
//!
//! Provides in-memory implementations of the collaborator traits so the
//! matcher can be exercised deterministically without SQLite.
//!
//! # Components
//!
//! - [`MockPantry`] - Pantry snapshots per user, with a fetch counter
//! - [`MemorySuggestionStore`] - Suggestion cache backed by a map
//! - [`MemoryFeedbackLog`] / [`MemoryGenerationLog`] - Capturing sinks
//! - [`fixtures`] - Builders for pantry items and requests

pub mod fixtures;
pub mod mock_pantry;
pub mod mock_stores;

pub use mock_pantry::{FailingPantry, MockPantry};
pub use mock_stores::{MemoryFeedbackLog, MemoryGenerationLog, MemorySuggestionStore};
