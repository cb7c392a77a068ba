// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over a scenario source.

pub mod find;
pub mod picks;
pub mod probability;

pub use find::{find_path_to_node, normalize_name, suggest_nodes, FoundPath, MatchKind, Suggestion};
pub use picks::{leaf_picks, resolve_nodes, LeafPick, DEFAULT_PICK_DEPTH};
pub use probability::aggregate_probability;
