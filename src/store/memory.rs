// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tokio::sync::watch;

use super::{HandoffRecord, HandoffStore, StoreError};

/// In-process handoff slot; every publish/clear is broadcast to subscribers.
#[derive(Debug)]
pub struct MemoryHandoffStore {
    slot: watch::Sender<Option<HandoffRecord>>,
}

impl MemoryHandoffStore {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self { slot }
    }

    /// Receiver that observes the slot; starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Option<HandoffRecord>> {
        self.slot.subscribe()
    }
}

impl Default for MemoryHandoffStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HandoffStore for MemoryHandoffStore {
    fn publish(&self, record: HandoffRecord) -> Result<(), StoreError> {
        tracing::info!(primary_id = %record.primary_id, path = %record.path, "handoff published");
        self.slot.send_replace(Some(record));
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if self.slot.send_replace(None).is_some() {
            tracing::info!("handoff cleared");
        }
        Ok(())
    }

    fn read(&self) -> Result<Option<HandoffRecord>, StoreError> {
        Ok(self.slot.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeId, Path};

    fn record(id: &str) -> HandoffRecord {
        let node_id = NodeId::new(id).expect("node id");
        HandoffRecord::new(node_id.clone(), id.to_uppercase(), Path::from_ids([node_id]))
    }

    #[test]
    fn starts_absent_and_last_write_wins() {
        let store = MemoryHandoffStore::new();
        assert_eq!(store.read().expect("read"), None);

        store.publish(record("a")).expect("publish a");
        store.publish(record("b")).expect("publish b");
        assert_eq!(store.read().expect("read"), Some(record("b")));

        store.clear().expect("clear");
        assert_eq!(store.read_or_absent(), None);
    }

    #[test]
    fn subscribers_see_changes() {
        let store = MemoryHandoffStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().expect("sender alive"));

        store.publish(record("a")).expect("publish");
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(rx.borrow_and_update().as_ref(), Some(&record("a")));

        store.clear().expect("clear");
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(*rx.borrow_and_update(), None);
    }
}
