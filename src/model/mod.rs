// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Scenario sources come in two shapes (per-step option tables and nested trees); both are
//! read-only once loaded. The only mutable value type is [`Path`].

pub mod fixtures;
pub mod ids;
pub mod node;
pub mod option;
pub mod path;
pub mod tree;

pub use ids::{Id, IdError, NodeId, StepId};
pub use node::NodeRef;
pub use option::{Analysis, FlatOption, OptionKind, Step};
pub use path::Path;
pub use tree::TreeNode;
