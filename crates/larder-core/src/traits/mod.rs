// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the matcher.
//!
//! All traits use `#[async_trait]` so services can hold them as
//! `Arc<dyn Trait>` and tests can substitute in-memory doubles.

pub mod feedback;
pub mod generation;
pub mod pantry;
pub mod suggestion;

pub use feedback::FeedbackLog;
pub use generation::GenerationLog;
pub use pantry::PantrySource;
pub use suggestion::SuggestionStore;
