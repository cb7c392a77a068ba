// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Leaf-level pick list whose expand/collapse drives the handoff slot.

use std::sync::Arc;

use crate::model::NodeId;
use crate::query::{leaf_picks, LeafPick};
use crate::source::TreeSource;
use crate::store::{HandoffRecord, HandoffStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShelfChange {
    Expanded(NodeId),
    Collapsed,
    Ignored,
}

/// At most one pick is expanded at a time; the expanded pick is the active handoff.
#[derive(Debug)]
pub struct PickShelf {
    picks: Vec<LeafPick>,
    expanded: Option<NodeId>,
    store: Arc<dyn HandoffStore>,
}

impl PickShelf {
    /// Opening the shelf clears any handoff left by another view.
    pub fn new(picks: Vec<LeafPick>, store: Arc<dyn HandoffStore>) -> Self {
        let shelf = Self { picks, expanded: None, store };
        shelf.clear_store();
        shelf
    }

    pub fn from_source<S>(source: &S, min_depth: usize, store: Arc<dyn HandoffStore>) -> Self
    where
        S: TreeSource + ?Sized,
    {
        Self::new(leaf_picks(source, min_depth), store)
    }

    pub fn picks(&self) -> &[LeafPick] {
        &self.picks
    }

    pub fn expanded(&self) -> Option<&LeafPick> {
        let expanded = self.expanded.as_ref()?;
        self.pick(expanded)
    }

    pub fn pick(&self, node_id: &NodeId) -> Option<&LeafPick> {
        self.picks.iter().find(|pick| &pick.node_id == node_id)
    }

    /// Expand `node_id`, or collapse it when it is already expanded.
    pub fn toggle(&mut self, node_id: &NodeId) -> ShelfChange {
        if self.expanded.as_ref() == Some(node_id) {
            self.collapse();
            return ShelfChange::Collapsed;
        }

        let Some(pick) = self.pick(node_id) else {
            tracing::debug!(node_id = %node_id, "toggle ignored: not on the shelf");
            return ShelfChange::Ignored;
        };

        let record = HandoffRecord::new(pick.node_id.clone(), &pick.display_name, pick.path.clone());
        if let Err(err) = self.store.publish(record) {
            tracing::warn!(error = %err, "failed to publish handoff");
        }
        self.expanded = Some(node_id.clone());
        ShelfChange::Expanded(node_id.clone())
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
        self.clear_store();
    }

    fn clear_store(&self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to clear handoff");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::DEFAULT_PICK_DEPTH;
    use crate::source::DataSource;
    use crate::store::MemoryHandoffStore;

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    fn shelf(store: &Arc<MemoryHandoffStore>) -> PickShelf {
        let tree = DataSource::demo_tree().expect("demo tree");
        PickShelf::from_source(&tree, DEFAULT_PICK_DEPTH, store.clone())
    }

    #[test]
    fn opening_clears_a_stale_handoff() {
        let store = Arc::new(MemoryHandoffStore::new());
        store
            .publish(HandoffRecord::new(nid("old"), "Old", Default::default()))
            .expect("publish");

        let shelf = shelf(&store);
        assert_eq!(store.read().expect("read"), None);
        assert_eq!(shelf.picks().len(), 12);
    }

    #[test]
    fn expanding_publishes_and_collapsing_clears() {
        let store = Arc::new(MemoryHandoffStore::new());
        let mut shelf = shelf(&store);

        assert_eq!(shelf.toggle(&nid("vc_hd_2")), ShelfChange::Expanded(nid("vc_hd_2")));
        let record = store.read().expect("read").expect("published");
        assert_eq!(record.display_name, "Hyosung Heavy Industries");
        assert_eq!(
            record.path.to_string(),
            "macro_ai > sector_infra > theme_trans > stock_hd > vc_hd_2"
        );

        assert_eq!(shelf.toggle(&nid("vc_alt_1")), ShelfChange::Expanded(nid("vc_alt_1")));
        assert_eq!(store.read().expect("read").map(|r| r.primary_id), Some(nid("vc_alt_1")));

        assert_eq!(shelf.toggle(&nid("vc_alt_1")), ShelfChange::Collapsed);
        assert_eq!(store.read().expect("read"), None);
        assert!(shelf.expanded().is_none());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let store = Arc::new(MemoryHandoffStore::new());
        let mut shelf = shelf(&store);
        shelf.toggle(&nid("vc_sk_1"));

        assert_eq!(shelf.toggle(&nid("stock_sk")), ShelfChange::Ignored);
        assert_eq!(shelf.expanded().map(|pick| pick.node_id.as_str()), Some("vc_sk_1"));
        assert!(store.read().expect("read").is_some());
    }
}
