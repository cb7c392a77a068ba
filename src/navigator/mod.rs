// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The scenario path navigator.
//!
//! [`Navigator`] owns the selection path over one [`DataSource`] and is the only thing that
//! mutates it. Every accepted transition is applied atomically through [`crate::ops`] and then
//! announced once on a watch channel as a [`PathSnapshot`]. Illegal requests (unknown ids,
//! options not offered under the current path) are logged and swallowed: the caller gets
//! `None` and the path is untouched. The `try_*` variants expose the typed rejection instead.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{NodeId, NodeRef, Path};
use crate::ops::{apply_ops, descend_chain, ApplyError, ApplyResult, NavOp, PathDelta, PathState};
use crate::query::{aggregate_probability, find_path_to_node, FoundPath};
use crate::source::{DataSource, TreeSource};
use crate::store::{HandoffRecord, HandoffStore};

/// Which view drives the navigator; only `confirm_step` differs between them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowMode {
    /// Two-panel step flow: confirming a depth drops every selection below it.
    #[default]
    Flow,
    /// Builder canvas: confirming a depth only commits it.
    Builder,
}

impl FlowMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flow => "flow",
            Self::Builder => "builder",
        }
    }
}

impl fmt::Display for FlowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flow" => Ok(Self::Flow),
            "builder" => Ok(Self::Builder),
            other => Err(format!("unknown mode {other:?} (expected flow or builder)")),
        }
    }
}

/// What observers see after each accepted transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSnapshot {
    pub path: Path,
    pub committed: Vec<bool>,
    pub aggregate_probability: u8,
    pub rev: u64,
}

/// How [`Navigator::resume`] rebuilt the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeSource {
    /// The record's own path was still legal.
    RecordPath,
    /// Found by the record's primary id.
    PrimaryId,
    /// Found by the record's display name.
    DisplayName,
    /// Nothing matched; fell back to the default path.
    Default,
}

impl ResumeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RecordPath => "record_path",
            Self::PrimaryId => "primary_id",
            Self::DisplayName => "display_name",
            Self::Default => "default",
        }
    }
}

#[derive(Debug)]
pub struct Navigator {
    source: Arc<DataSource>,
    mode: FlowMode,
    state: PathState,
    active: Option<NodeId>,
    focus_depth: usize,
    handoff: Option<Arc<dyn HandoffStore>>,
    snapshots: watch::Sender<PathSnapshot>,
}

impl Navigator {
    pub fn new(source: Arc<DataSource>) -> Self {
        let (snapshots, _) = watch::channel(PathSnapshot::default());
        Self {
            source,
            mode: FlowMode::default(),
            state: PathState::new(),
            active: None,
            focus_depth: 0,
            handoff: None,
            snapshots,
        }
    }

    pub fn with_mode(mut self, mode: FlowMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_handoff(mut self, handoff: Arc<dyn HandoffStore>) -> Self {
        self.handoff = Some(handoff);
        self
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn mode(&self) -> FlowMode {
        self.mode
    }

    pub fn state(&self) -> &PathState {
        &self.state
    }

    pub fn path(&self) -> &Path {
        self.state.path()
    }

    pub fn rev(&self) -> u64 {
        self.state.rev()
    }

    pub fn handoff(&self) -> Option<&Arc<dyn HandoffStore>> {
        self.handoff.as_ref()
    }

    pub fn subscribe(&self) -> watch::Receiver<PathSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> PathSnapshot {
        PathSnapshot {
            path: self.state.path().clone(),
            committed: self.state.committed_flags().to_vec(),
            aggregate_probability: self.aggregate_probability(),
            rev: self.state.rev(),
        }
    }

    /// Options offered at `depth` under the current path; empty when the prerequisite is unmet.
    pub fn children_of(&self, depth: usize) -> Vec<NodeRef<'_>> {
        self.source.children_of(depth, self.state.path())
    }

    /// Select `node_id` at `depth`, truncating below it and auto-descending to a leaf.
    ///
    /// Returns `None` (path untouched) when the node is not offered there.
    pub fn select(&mut self, depth: usize, node_id: &NodeId) -> Option<PathDelta> {
        match self.try_select(depth, node_id, None) {
            Ok(result) => Some(result.delta),
            Err(err) => {
                tracing::debug!(depth, node_id = %node_id, error = %err, "selection ignored");
                None
            }
        }
    }

    /// Like [`select`](Self::select), but reports why a request was rejected. With
    /// `base_rev`, the call also fails when the path moved on since that revision.
    pub fn try_select(
        &mut self,
        depth: usize,
        node_id: &NodeId,
        base_rev: Option<u64>,
    ) -> Result<ApplyResult, ApplyError> {
        let op = NavOp::Select { depth, node_id: node_id.clone() };
        let result = self.apply(base_rev, &[op])?;
        self.active = Some(node_id.clone());
        Ok(result)
    }

    /// Commit the selection at `depth` and publish it as the active handoff.
    ///
    /// In [`FlowMode::Flow`] every selection below `depth` is dropped. Returns `None` when
    /// nothing is selected at `depth`.
    pub fn confirm_step(&mut self, depth: usize) -> Option<PathDelta> {
        match self.try_confirm_step(depth, None) {
            Ok(result) => Some(result.delta),
            Err(err) => {
                tracing::debug!(depth, error = %err, "confirm ignored");
                None
            }
        }
    }

    pub fn try_confirm_step(
        &mut self,
        depth: usize,
        base_rev: Option<u64>,
    ) -> Result<ApplyResult, ApplyError> {
        let truncate_downstream = self.mode == FlowMode::Flow;
        let result = self.apply(base_rev, &[NavOp::Confirm { depth, truncate_downstream }])?;
        self.publish_handoff();
        Ok(result)
    }

    /// Drop the whole path and clear the handoff.
    pub fn reset(&mut self) -> PathDelta {
        let delta = self.apply(None, &[NavOp::Reset]).map(|result| result.delta).unwrap_or_default();
        self.active = None;
        self.focus_depth = 0;
        if let Some(handoff) = &self.handoff {
            if let Err(err) = handoff.clear() {
                tracing::warn!(error = %err, "failed to clear handoff");
            }
        }
        delta
    }

    /// `select(0, first root)`; a no-op on an empty source.
    pub fn seed_default(&mut self) -> Option<PathDelta> {
        let first = self.source.first_root()?.id().clone();
        self.select(0, &first)
    }

    pub fn find_path_to_node(&self, target: &str) -> Option<FoundPath> {
        find_path_to_node(self.source.as_ref(), target)
    }

    pub fn aggregate_probability(&self) -> u8 {
        aggregate_probability(self.source.as_ref(), self.state.path())
    }

    /// Depth 0 is always visible; deeper depths need a committed selection right above them.
    pub fn is_depth_visible(&self, depth: usize) -> bool {
        match depth {
            0 => true,
            _ => self.state.is_committed(depth - 1),
        }
    }

    /// Node most recently chosen by an explicit select, if it is still on the path.
    pub fn active_node(&self) -> Option<NodeRef<'_>> {
        let active = self.active.as_ref().filter(|id| self.state.path().contains(id))?;
        self.source.find_by_id(active)
    }

    /// Deepest selected node, falling back to the first root.
    pub fn last_selected(&self) -> Option<NodeRef<'_>> {
        self.state
            .path()
            .last()
            .and_then(|node_id| self.source.find_by_id(node_id))
            .or_else(|| self.source.first_root())
    }

    pub fn focus_depth(&self) -> usize {
        self.focus_depth
    }

    /// Move the step cursor one depth down when the focused depth has a selection.
    pub fn advance(&mut self) -> bool {
        let next = self.focus_depth + 1;
        if next >= self.source.depth_count() || self.state.path().get(self.focus_depth).is_none() {
            return false;
        }
        self.focus_depth = next;
        true
    }

    pub fn retreat(&mut self) -> bool {
        if self.focus_depth == 0 {
            return false;
        }
        self.focus_depth -= 1;
        true
    }

    pub fn set_focus(&mut self, depth: usize) -> bool {
        if depth >= self.source.depth_count() {
            return false;
        }
        self.focus_depth = depth;
        true
    }

    /// Rebuild a path from a handoff record.
    ///
    /// Tries the record's path, then its primary id, then its display name; the result is
    /// extended to a leaf along first children. When nothing resolves, falls back to
    /// [`seed_default`](Self::seed_default). `focus` is applied when it names a valid depth.
    pub fn resume(&mut self, record: &HandoffRecord, focus: Option<usize>) -> ResumeSource {
        let resolved = if !record.path.is_empty() && self.source.is_valid_path(&record.path) {
            Some((record.path.clone(), ResumeSource::RecordPath))
        } else {
            self.find_path_to_node(record.primary_id.as_str())
                .map(|found| (found.path, ResumeSource::PrimaryId))
                .or_else(|| {
                    self.find_path_to_node(&record.display_name)
                        .map(|found| (found.path, ResumeSource::DisplayName))
                })
        };

        let Some((mut path, resumed_from)) = resolved else {
            tracing::debug!(primary_id = %record.primary_id, "handoff unresolvable; using default path");
            self.resume_default();
            return ResumeSource::Default;
        };

        let committed = path.len();
        for child in descend_chain(self.source.as_ref(), &path) {
            path.push(child);
        }
        let active = path.get(committed.saturating_sub(1)).cloned();

        match self.apply(None, &[NavOp::Replace { path, committed }]) {
            Ok(_) => self.active = active,
            Err(err) => {
                tracing::debug!(error = %err, "resumed path rejected; using default path");
                self.resume_default();
                return ResumeSource::Default;
            }
        }

        if let Some(depth) = focus {
            self.set_focus(depth);
        }
        resumed_from
    }

    /// The record `confirm_step` would publish for the current path.
    pub fn handoff_record(&self) -> Option<HandoffRecord> {
        let last = self.state.path().last()?;
        let display_name =
            self.source.find_by_id(last).map(|node| node.display_name().to_owned())?;
        Some(HandoffRecord::new(last.clone(), display_name, self.state.path().clone()))
    }

    fn publish_handoff(&self) {
        let Some(handoff) = &self.handoff else {
            return;
        };
        let Some(record) = self.handoff_record() else {
            return;
        };
        if let Err(err) = handoff.publish(record) {
            tracing::warn!(error = %err, "failed to publish handoff");
        }
    }

    /// Replace the path with the default one in a single transition.
    fn resume_default(&mut self) {
        let Some(first) = self.source.first_root().map(|root| root.id().clone()) else {
            let _ = self.apply(None, &[NavOp::Reset]);
            self.active = None;
            return;
        };

        let mut path = Path::from_ids([first.clone()]);
        for child in descend_chain(self.source.as_ref(), &path) {
            path.push(child);
        }
        match self.apply(None, &[NavOp::Replace { path, committed: 1 }]) {
            Ok(_) => self.active = Some(first),
            Err(err) => tracing::warn!(error = %err, "default path rejected"),
        }
    }

    fn apply(&mut self, base_rev: Option<u64>, ops: &[NavOp]) -> Result<ApplyResult, ApplyError> {
        let base_rev = base_rev.unwrap_or_else(|| self.state.rev());
        let result = apply_ops(self.source.as_ref(), &mut self.state, base_rev, ops)?;
        if !result.delta.is_empty() {
            self.snapshots.send_replace(self.snapshot());
        }
        Ok(result)
    }
}
