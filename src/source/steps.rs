// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{HashMap, HashSet};

use crate::model::{FlatOption, NodeId, NodeRef, Path, Step};

use super::{SourceError, SourceShape, TreeSource};

/// Flat source: one option list per depth, linked by `parentId`.
#[derive(Debug, Clone)]
pub struct StepTable {
    steps: Vec<Step>,
    // node id -> (step index, option index)
    index: HashMap<NodeId, (usize, usize)>,
}

impl StepTable {
    pub fn new(steps: Vec<Step>) -> Result<Self, SourceError> {
        let mut index = HashMap::new();
        let mut previous: HashSet<&NodeId> = HashSet::new();

        for (depth, step) in steps.iter().enumerate() {
            let mut current = HashSet::new();
            for (slot, option) in step.options().iter().enumerate() {
                validate_option(depth, option, &previous)?;
                if index.insert(option.id().clone(), (depth, slot)).is_some() {
                    return Err(SourceError::DuplicateId { node_id: option.id().clone() });
                }
                current.insert(option.id());
            }
            previous = current;
        }

        Ok(Self { steps, index })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step(&self, depth: usize) -> Option<&Step> {
        self.steps.get(depth)
    }

    pub fn option(&self, node_id: &NodeId) -> Option<&FlatOption> {
        let &(depth, slot) = self.index.get(node_id)?;
        self.steps.get(depth)?.options().get(slot)
    }
}

fn validate_option(
    depth: usize,
    option: &FlatOption,
    previous: &HashSet<&NodeId>,
) -> Result<(), SourceError> {
    if option.probability() > 100 {
        return Err(SourceError::ProbabilityOutOfRange {
            node_id: option.id().clone(),
            probability: option.probability(),
        });
    }

    match (depth, option.parent_id()) {
        (0, Some(parent_id)) => Err(SourceError::RootWithParent {
            node_id: option.id().clone(),
            parent_id: parent_id.clone(),
        }),
        (_, Some(parent_id)) if !previous.contains(parent_id) => Err(SourceError::UnknownParent {
            node_id: option.id().clone(),
            parent_id: parent_id.clone(),
            depth,
        }),
        _ => Ok(()),
    }
}

impl TreeSource for StepTable {
    fn shape(&self) -> SourceShape {
        SourceShape::Steps
    }

    fn depth_count(&self) -> usize {
        self.steps.len()
    }

    fn depth_label(&self, depth: usize) -> Option<&str> {
        self.steps.get(depth).map(Step::title)
    }

    fn roots(&self) -> Vec<NodeRef<'_>> {
        self.children_of(0, &Path::new())
    }

    fn children_of(&self, depth: usize, path: &Path) -> Vec<NodeRef<'_>> {
        let Some(step) = self.steps.get(depth) else {
            return Vec::new();
        };

        let selected_parent = match depth {
            0 => None,
            _ => match path.get(depth - 1) {
                Some(parent) => Some(parent),
                None => return Vec::new(),
            },
        };

        // Parentless options are offered under any upstream selection.
        step.options()
            .iter()
            .filter(|option| match option.parent_id() {
                None => true,
                Some(parent_id) => Some(parent_id) == selected_parent,
            })
            .map(NodeRef::Option)
            .collect()
    }

    fn find_by_id(&self, node_id: &NodeId) -> Option<NodeRef<'_>> {
        self.option(node_id).map(NodeRef::Option)
    }

    fn depth_of(&self, node_id: &NodeId) -> Option<usize> {
        self.index.get(node_id).map(|&(depth, _)| depth)
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
