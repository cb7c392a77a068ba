// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;

use crate::model::{NodeId, NodeRef, Path};
use crate::source::TreeSource;

/// Depth of the anchor stocks in the demo tree; leaves above it are not offered as picks.
pub const DEFAULT_PICK_DEPTH: usize = 3;

/// A leaf-level summary entry with the chain that leads to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafPick {
    pub node_id: NodeId,
    pub display_name: String,
    pub depth: usize,
    pub path: Path,
}

/// Every leaf at depth `>= min_depth`, in depth-first order.
///
/// A node reached under several parents (parentless flat options) is listed once, under the
/// first chain that reaches it.
pub fn leaf_picks<S>(source: &S, min_depth: usize) -> Vec<LeafPick>
where
    S: TreeSource + ?Sized,
{
    let mut picks = Vec::new();
    let mut seen = HashSet::new();
    let mut prefix = Path::new();
    walk(source, min_depth, &mut prefix, &mut seen, &mut picks);
    picks
}

fn walk<S>(
    source: &S,
    min_depth: usize,
    prefix: &mut Path,
    seen: &mut HashSet<NodeId>,
    picks: &mut Vec<LeafPick>,
) where
    S: TreeSource + ?Sized,
{
    let depth = prefix.len();
    for node in source.children_of(depth, prefix) {
        prefix.push(node.id().clone());
        if source.children_of(depth + 1, prefix).is_empty() {
            if depth >= min_depth && seen.insert(node.id().clone()) {
                picks.push(pick(node, depth, prefix));
            }
        } else {
            walk(source, min_depth, prefix, seen, picks);
        }
        prefix.truncate(depth);
    }
}

fn pick(node: NodeRef<'_>, depth: usize, path: &Path) -> LeafPick {
    LeafPick {
        node_id: node.id().clone(),
        display_name: node.display_name().to_owned(),
        depth,
        path: path.clone(),
    }
}

/// Resolve every entry of `path`, stopping at the first id the source does not know.
pub fn resolve_nodes<'a, S>(source: &'a S, path: &Path) -> Vec<NodeRef<'a>>
where
    S: TreeSource + ?Sized,
{
    path.iter().map_while(|node_id| source.find_by_id(node_id)).collect()
}
