// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod feedback;
pub mod generations;
pub mod pantry;
pub mod suggestions;
