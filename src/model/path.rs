// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::ids::NodeId;

/// Inline capacity covers the deepest fixtures (macro → sector → theme → anchor → supplier).
const INLINE_DEPTHS: usize = 6;

/// Ordered node ids, one per depth, starting at depth 0.
///
/// A path never has gaps: `get(d)` is `Some` for every `d < len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    ids: SmallVec<[NodeId; INLINE_DEPTHS]>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Self { ids: ids.into_iter().collect() }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, depth: usize) -> Option<&NodeId> {
        self.ids.get(depth)
    }

    pub fn last(&self) -> Option<&NodeId> {
        self.ids.last()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.ids.iter()
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.ids.contains(node_id)
    }

    /// The first `depth` entries, i.e. everything strictly above `depth`.
    pub fn prefix(&self, depth: usize) -> Path {
        Self { ids: self.ids.iter().take(depth).cloned().collect() }
    }

    pub fn push(&mut self, node_id: NodeId) {
        self.ids.push(node_id);
    }

    /// Drops every entry at depth `>= len`.
    pub fn truncate(&mut self, len: usize) {
        self.ids.truncate(len);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.ids.iter().map(|id| id.as_str().to_owned()).collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, id) in self.ids.iter().enumerate() {
            if depth > 0 {
                f.write_str(" > ")?;
            }
            f.write_str(id.as_str())?;
        }
        Ok(())
    }
}

impl FromIterator<NodeId> for Path {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self::from_ids(iter)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
