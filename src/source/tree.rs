// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::model::{NodeId, NodeRef, Path, TreeNode};

use super::{SourceError, SourceShape, TreeSource};

/// Child indices from the root list down to a node.
type NodeAddr = SmallVec<[usize; 6]>;

/// Nested source: every node owns its ordered children.
#[derive(Debug, Clone)]
pub struct ScenarioTree {
    roots: Vec<TreeNode>,
    depth_labels: Vec<String>,
    index: HashMap<NodeId, NodeAddr>,
    height: usize,
}

impl ScenarioTree {
    pub fn new(roots: Vec<TreeNode>) -> Result<Self, SourceError> {
        let mut index = HashMap::new();
        let mut addr = NodeAddr::new();
        index_level(&roots, &mut addr, &mut index)?;
        let height = roots.iter().map(TreeNode::height).max().unwrap_or(0);
        Ok(Self { roots, depth_labels: Vec::new(), index, height })
    }

    pub fn with_depth_labels(mut self, depth_labels: Vec<String>) -> Self {
        self.depth_labels = depth_labels;
        self
    }

    pub fn depth_labels(&self) -> &[String] {
        &self.depth_labels
    }

    pub fn roots_slice(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn node(&self, node_id: &NodeId) -> Option<&TreeNode> {
        let addr = self.index.get(node_id)?;
        let (first, rest) = addr.split_first()?;
        let mut node = self.roots.get(*first)?;
        for &slot in rest {
            node = node.children().get(slot)?;
        }
        Some(node)
    }
}

fn index_level(
    level: &[TreeNode],
    addr: &mut NodeAddr,
    index: &mut HashMap<NodeId, NodeAddr>,
) -> Result<(), SourceError> {
    for (slot, node) in level.iter().enumerate() {
        addr.push(slot);
        if index.insert(node.id().clone(), addr.clone()).is_some() {
            return Err(SourceError::DuplicateId { node_id: node.id().clone() });
        }
        index_level(node.children(), addr, index)?;
        addr.pop();
    }
    Ok(())
}

impl TreeSource for ScenarioTree {
    fn shape(&self) -> SourceShape {
        SourceShape::Tree
    }

    fn depth_count(&self) -> usize {
        self.height
    }

    fn depth_label(&self, depth: usize) -> Option<&str> {
        self.depth_labels.get(depth).map(String::as_str)
    }

    fn roots(&self) -> Vec<NodeRef<'_>> {
        self.roots.iter().map(NodeRef::Tree).collect()
    }

    fn children_of(&self, depth: usize, path: &Path) -> Vec<NodeRef<'_>> {
        let mut level = self.roots.as_slice();
        for ancestor_depth in 0..depth {
            let Some(ancestor_id) = path.get(ancestor_depth) else {
                return Vec::new();
            };
            let Some(ancestor) = level.iter().find(|node| node.id() == ancestor_id) else {
                return Vec::new();
            };
            level = ancestor.children();
        }
        level.iter().map(NodeRef::Tree).collect()
    }

    fn find_by_id(&self, node_id: &NodeId) -> Option<NodeRef<'_>> {
        self.node(node_id).map(NodeRef::Tree)
    }

    fn depth_of(&self, node_id: &NodeId) -> Option<usize> {
        self.index.get(node_id).map(|addr| addr.len().saturating_sub(1))
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
