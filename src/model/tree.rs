// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::NodeId;

/// A node of the nested (recursive) source shape.
///
/// Depth is never stored: it is the number of ancestors between the node and the roots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    id: NodeId,
    name: String,
    #[serde(default)]
    index_name: String,
    #[serde(default)]
    index_value: f64,
    #[serde(default)]
    change: f64,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            index_name: String::new(),
            index_value: 0.0,
            change: 0.0,
            description: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_index(mut self, index_name: impl Into<String>, index_value: f64, change: f64) -> Self {
        self.index_name = index_name.into();
        self.index_value = index_value;
        self.change = change;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index_value(&self) -> f64 {
        self.index_value
    }

    pub fn change(&self) -> f64 {
        self.change
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<TreeNode> {
        &mut self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels in the subtree rooted here (a leaf has height 1).
    pub fn height(&self) -> usize {
        1 + self.children.iter().map(TreeNode::height).max().unwrap_or(0)
    }
}
