// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for the selection path.
//!
//! Operations are applied with optimistic concurrency (revision checks) against a scratch copy
//! and only swapped in when every op in the batch is legal, so observers never see a
//! half-applied batch. The result carries a per-depth delta.

use std::fmt;

use smallvec::SmallVec;

use crate::model::{NodeId, Path};
use crate::source::TreeSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOp {
    /// Set `depth`, drop everything below it, then auto-descend to a leaf.
    Select { depth: usize, node_id: NodeId },
    /// Commit the entry at `depth`; optionally drop every entry below it.
    Confirm { depth: usize, truncate_downstream: bool },
    Reset,
    /// Swap in a whole path; the first `committed` entries are marked committed.
    Replace { path: Path, committed: usize },
}

impl NavOp {
    pub fn kind(&self) -> NavOpKind {
        match self {
            Self::Select { .. } => NavOpKind::Select,
            Self::Confirm { .. } => NavOpKind::Confirm,
            Self::Reset => NavOpKind::Reset,
            Self::Replace { .. } => NavOpKind::Replace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOpKind {
    Select,
    Confirm,
    Reset,
    Replace,
}

/// The navigator's mutable state: one node id per depth plus its commit flag.
///
/// `committed.len() == path.len()` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathState {
    path: Path,
    committed: SmallVec<[bool; 6]>,
    rev: u64,
}

impl PathState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn committed_flags(&self) -> &[bool] {
        &self.committed
    }

    pub fn is_committed(&self, depth: usize) -> bool {
        self.committed.get(depth).copied().unwrap_or(false)
    }

    fn set_entry(&mut self, depth: usize, node_id: NodeId, committed: bool) {
        self.truncate(depth);
        self.path.push(node_id);
        self.committed.push(committed);
    }

    fn truncate(&mut self, len: usize) {
        self.path.truncate(len);
        self.committed.truncate(len);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: PathDelta,
}

/// Depths touched by a batch, each list ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathDelta {
    /// Depths whose node id changed or appeared.
    pub set: Vec<usize>,
    /// Depths that held an entry before and hold none now.
    pub cleared: Vec<usize>,
    /// Depths that became committed.
    pub committed: Vec<usize>,
}

impl PathDelta {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.cleared.is_empty() && self.committed.is_empty()
    }

    fn between(before: &PathState, after: &PathState) -> Self {
        let mut delta = Self::default();
        for depth in 0..before.path.len().max(after.path.len()) {
            match (before.path.get(depth), after.path.get(depth)) {
                (Some(old), Some(new)) if old == new => {}
                (_, Some(_)) => delta.set.push(depth),
                (Some(_), None) => delta.cleared.push(depth),
                (None, None) => {}
            }
            let newly_committed = after.is_committed(depth)
                && (!before.is_committed(depth) || delta.set.last() == Some(&depth));
            if newly_committed {
                delta.committed.push(depth);
            }
        }
        delta
    }
}

/// First-child chain below the last entry of `path`, down to a leaf.
pub fn descend_chain<S>(source: &S, path: &Path) -> Vec<NodeId>
where
    S: TreeSource + ?Sized,
{
    let mut scratch = path.clone();
    let mut chain = Vec::new();
    while scratch.len() < source.depth_count() {
        let Some(first) = source.children_of(scratch.len(), &scratch).into_iter().next() else {
            break;
        };
        let node_id = first.id().clone();
        scratch.push(node_id.clone());
        chain.push(node_id);
    }
    chain
}

pub fn apply_ops<S>(
    source: &S,
    state: &mut PathState,
    base_rev: u64,
    ops: &[NavOp],
) -> Result<ApplyResult, ApplyError>
where
    S: TreeSource + ?Sized,
{
    let current_rev = state.rev;
    if base_rev != current_rev {
        return Err(ApplyError::Conflict { base_rev, current_rev });
    }

    let mut next = state.clone();
    for op in ops {
        apply_op(source, &mut next, op)?;
    }

    let delta = PathDelta::between(state, &next);
    if delta.is_empty() {
        return Ok(ApplyResult { new_rev: current_rev, applied: ops.len(), delta });
    }

    next.rev = current_rev + 1;
    *state = next;
    Ok(ApplyResult { new_rev: state.rev, applied: ops.len(), delta })
}

fn apply_op<S>(source: &S, state: &mut PathState, op: &NavOp) -> Result<(), ApplyError>
where
    S: TreeSource + ?Sized,
{
    match op {
        NavOp::Select { depth, node_id } => {
            let depth = *depth;
            check_depth(source, depth)?;
            if depth > state.path.len() {
                return Err(ApplyError::ParentMissing { depth });
            }
            if !source.is_child_of(depth, &state.path, node_id) {
                return Err(not_a_child(source, depth, node_id));
            }

            state.set_entry(depth, node_id.clone(), true);
            for child in descend_chain(source, &state.path) {
                let child_depth = state.path.len();
                state.set_entry(child_depth, child, false);
            }
            Ok(())
        }
        NavOp::Confirm { depth, truncate_downstream } => {
            let depth = *depth;
            check_depth(source, depth)?;
            let Some(flag) = state.committed.get_mut(depth) else {
                return Err(ApplyError::NothingSelected { depth });
            };
            *flag = true;
            if *truncate_downstream {
                state.truncate(depth + 1);
            }
            Ok(())
        }
        NavOp::Reset => {
            state.truncate(0);
            Ok(())
        }
        NavOp::Replace { path, committed } => {
            if path.len() > source.depth_count() {
                return Err(ApplyError::DepthOutOfRange {
                    depth: path.len() - 1,
                    depth_count: source.depth_count(),
                });
            }
            let illegal = path
                .iter()
                .enumerate()
                .find(|(depth, node_id)| !source.is_child_of(*depth, path, node_id));
            if let Some((depth, node_id)) = illegal {
                return Err(not_a_child(source, depth, node_id));
            }

            state.truncate(0);
            for (depth, node_id) in path.iter().enumerate() {
                state.set_entry(depth, node_id.clone(), depth < *committed);
            }
            Ok(())
        }
    }
}

fn check_depth<S>(source: &S, depth: usize) -> Result<(), ApplyError>
where
    S: TreeSource + ?Sized,
{
    let depth_count = source.depth_count();
    if depth >= depth_count {
        return Err(ApplyError::DepthOutOfRange { depth, depth_count });
    }
    Ok(())
}

fn not_a_child<S>(source: &S, depth: usize, node_id: &NodeId) -> ApplyError
where
    S: TreeSource + ?Sized,
{
    if source.find_by_id(node_id).is_none() {
        ApplyError::UnknownNode { node_id: node_id.clone() }
    } else {
        ApplyError::NotAChild { depth, node_id: node_id.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict { base_rev: u64, current_rev: u64 },
    DepthOutOfRange { depth: usize, depth_count: usize },
    ParentMissing { depth: usize },
    UnknownNode { node_id: NodeId },
    NotAChild { depth: usize, node_id: NodeId },
    NothingSelected { depth: usize },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { base_rev, current_rev } => {
                write!(f, "stale base_rev (base_rev={base_rev}, current_rev={current_rev})")
            }
            Self::DepthOutOfRange { depth, depth_count } => {
                write!(f, "depth {depth} is out of range (depth_count={depth_count})")
            }
            Self::ParentMissing { depth } => {
                write!(f, "depth {depth} has no selection above it")
            }
            Self::UnknownNode { node_id } => write!(f, "node not found (id={node_id})"),
            Self::NotAChild { depth, node_id } => {
                write!(f, "node {node_id} is not offered at depth {depth} under the current path")
            }
            Self::NothingSelected { depth } => write!(f, "nothing selected at depth {depth}"),
        }
    }
}

impl std::error::Error for ApplyError {}
