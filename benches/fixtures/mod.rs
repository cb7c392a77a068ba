// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use narrative::model::{NodeId, TreeNode};
use narrative::source::{DataSource, SourceDocument};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// 4 levels, fanout 3.
    Small,
    /// 5 levels, fanout 6.
    Wide,
    /// 8 levels, fanout 2.
    Deep,
}

impl Case {
    fn shape(self) -> (usize, usize) {
        match self {
            Self::Small => (4, 3),
            Self::Wide => (5, 6),
            Self::Deep => (8, 2),
        }
    }
}

/// Full tree with ids like `n_0_2_1` and names like `Node 0.2.1 (Group)`.
pub fn tree(case: Case) -> DataSource {
    let (depth, fanout) = case.shape();
    let roots = (0..fanout).map(|i| node(&[i], depth, fanout)).collect();
    DataSource::from_document(SourceDocument::Tree { depth_labels: Vec::new(), roots })
        .expect("synthetic tree is valid")
}

fn node(address: &[usize], depth: usize, fanout: usize) -> TreeNode {
    let suffix = address.iter().map(ToString::to_string).collect::<Vec<_>>();
    let id = NodeId::new(format!("n_{}", suffix.join("_"))).expect("node id");
    let tree_node = TreeNode::new(id, format!("Node {} (Group)", suffix.join(".")));
    if address.len() >= depth {
        return tree_node;
    }

    let children = (0..fanout)
        .map(|i| {
            let mut child = address.to_vec();
            child.push(i);
            node(&child, depth, fanout)
        })
        .collect();
    tree_node.with_children(children)
}

/// Id of the last node at `depth` along the last-child chain.
pub fn last_at(case: Case, depth: usize) -> NodeId {
    let (_, fanout) = case.shape();
    let suffix = vec![(fanout - 1).to_string(); depth + 1];
    NodeId::new(format!("n_{}", suffix.join("_"))).expect("node id")
}
