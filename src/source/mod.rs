// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only scenario sources.
//!
//! Two physical shapes are supported: a per-step option table whose options point back at the
//! previous step via `parentId` ([`StepTable`]), and a nested tree ([`ScenarioTree`]). Both are
//! exposed through [`TreeSource`], and [`DataSource`] selects one at construction time so call
//! sites never branch on the shape.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path as FsPath, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::fixtures::{demo_steps, demo_tree, DEMO_DEPTH_LABELS};
use crate::model::{NodeId, NodeRef, Path, Step, TreeNode};

mod steps;
mod tree;

pub use steps::StepTable;
pub use tree::ScenarioTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceShape {
    Steps,
    Tree,
}

impl SourceShape {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::Tree => "tree",
        }
    }
}

impl fmt::Display for SourceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hierarchical, read-only option source.
///
/// `children_of(depth, path)` is the single legality oracle: a node may sit at `depth` of a
/// path iff it is returned for the path's prefix above `depth`. It never fails; an unmet
/// prerequisite simply yields no options.
pub trait TreeSource {
    fn shape(&self) -> SourceShape;

    /// Number of depths a path can span.
    fn depth_count(&self) -> usize;

    fn depth_label(&self, depth: usize) -> Option<&str>;

    fn roots(&self) -> Vec<NodeRef<'_>>;

    /// Options offered at `depth` given the selections of `path` above it.
    ///
    /// Only `path[..depth]` is consulted; entries at or below `depth` are ignored.
    fn children_of(&self, depth: usize, path: &Path) -> Vec<NodeRef<'_>>;

    fn find_by_id(&self, node_id: &NodeId) -> Option<NodeRef<'_>>;

    /// Depth at which `node_id` lives, if it exists.
    fn depth_of(&self, node_id: &NodeId) -> Option<usize>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn first_root(&self) -> Option<NodeRef<'_>> {
        self.roots().into_iter().next()
    }

    /// Whether `node_id` is a legal entry at `depth` under `path`.
    fn is_child_of(&self, depth: usize, path: &Path, node_id: &NodeId) -> bool {
        self.children_of(depth, path).iter().any(|node| node.id() == node_id)
    }

    /// Whether every entry of `path` is a legal child of the entry above it.
    fn is_valid_path(&self, path: &Path) -> bool {
        if path.len() > self.depth_count() {
            return false;
        }
        path.iter()
            .enumerate()
            .all(|(depth, node_id)| self.is_child_of(depth, path, node_id))
    }
}

/// A loaded scenario source of either shape.
#[derive(Debug, Clone)]
pub enum DataSource {
    Steps(StepTable),
    Tree(ScenarioTree),
}

impl DataSource {
    pub fn from_document(document: SourceDocument) -> Result<Self, SourceError> {
        match document {
            SourceDocument::Steps { steps } => Ok(Self::Steps(StepTable::new(steps)?)),
            SourceDocument::Tree { depth_labels, roots } => {
                Ok(Self::Tree(ScenarioTree::new(roots)?.with_depth_labels(depth_labels)))
            }
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let document: SourceDocument =
            serde_json::from_str(json).map_err(|source| SourceError::Json { path: None, source })?;
        Self::from_document(document)
    }

    pub fn from_path(path: impl AsRef<FsPath>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|source| SourceError::Io { path: path.to_path_buf(), source })?;
        let document: SourceDocument = serde_json::from_str(&json).map_err(|source| {
            SourceError::Json { path: Some(path.to_path_buf()), source }
        })?;
        Self::from_document(document)
    }

    pub fn demo_steps() -> Result<Self, SourceError> {
        Ok(Self::Steps(StepTable::new(demo_steps())?))
    }

    pub fn demo_tree() -> Result<Self, SourceError> {
        let labels = DEMO_DEPTH_LABELS.iter().map(|label| (*label).to_owned()).collect();
        Ok(Self::Tree(ScenarioTree::new(demo_tree())?.with_depth_labels(labels)))
    }

    pub fn to_document(&self) -> SourceDocument {
        match self {
            Self::Steps(table) => SourceDocument::Steps { steps: table.steps().to_vec() },
            Self::Tree(tree) => SourceDocument::Tree {
                depth_labels: tree.depth_labels().to_vec(),
                roots: tree.roots_slice().to_vec(),
            },
        }
    }

    fn inner(&self) -> &dyn TreeSource {
        match self {
            Self::Steps(table) => table,
            Self::Tree(tree) => tree,
        }
    }
}

impl TreeSource for DataSource {
    fn shape(&self) -> SourceShape {
        self.inner().shape()
    }

    fn depth_count(&self) -> usize {
        self.inner().depth_count()
    }

    fn depth_label(&self, depth: usize) -> Option<&str> {
        self.inner().depth_label(depth)
    }

    fn roots(&self) -> Vec<NodeRef<'_>> {
        self.inner().roots()
    }

    fn children_of(&self, depth: usize, path: &Path) -> Vec<NodeRef<'_>> {
        self.inner().children_of(depth, path)
    }

    fn find_by_id(&self, node_id: &NodeId) -> Option<NodeRef<'_>> {
        self.inner().find_by_id(node_id)
    }

    fn depth_of(&self, node_id: &NodeId) -> Option<usize> {
        self.inner().depth_of(node_id)
    }

    fn len(&self) -> usize {
        self.inner().len()
    }
}

/// On-disk JSON form of a source, tagged by `shape`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SourceDocument {
    Steps {
        steps: Vec<Step>,
    },
    Tree {
        #[serde(default, rename = "depthLabels", skip_serializing_if = "Vec::is_empty")]
        depth_labels: Vec<String>,
        roots: Vec<TreeNode>,
    },
}

#[derive(Debug)]
pub enum SourceError {
    Io { path: PathBuf, source: io::Error },
    Json { path: Option<PathBuf>, source: serde_json::Error },
    DuplicateId { node_id: NodeId },
    ProbabilityOutOfRange { node_id: NodeId, probability: u8 },
    RootWithParent { node_id: NodeId, parent_id: NodeId },
    UnknownParent { node_id: NodeId, parent_id: NodeId, depth: usize },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path: Some(path), source } => {
                write!(f, "json error at {path:?}: {source}")
            }
            Self::Json { path: None, source } => write!(f, "json error: {source}"),
            Self::DuplicateId { node_id } => write!(f, "duplicate node id {node_id}"),
            Self::ProbabilityOutOfRange { node_id, probability } => {
                write!(f, "probability {probability} of {node_id} is outside 0..=100")
            }
            Self::RootWithParent { node_id, parent_id } => {
                write!(f, "first-step option {node_id} must not have a parent (got {parent_id})")
            }
            Self::UnknownParent { node_id, parent_id, depth } => write!(
                f,
                "option {node_id} at depth {depth} references {parent_id}, which is not an option of the previous step"
            ),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::DuplicateId { .. }
            | Self::ProbabilityOutOfRange { .. }
            | Self::RootWithParent { .. }
            | Self::UnknownParent { .. } => None,
        }
    }
}
