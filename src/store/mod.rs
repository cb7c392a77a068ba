// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The shared handoff slot.
//!
//! Whoever activates a path publishes a [`HandoffRecord`]; unrelated consumers read it without
//! holding a reference to the navigator. Last write wins. Two backends exist: an in-process
//! [`MemoryHandoffStore`] with change notification, and a file-backed [`HandoffFolder`] that
//! survives restarts and tracks a session flag.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::{NodeId, Path};

pub mod folder;
pub mod memory;

pub use folder::{HandoffFolder, StartupPolicy, StartupReport, WriteDurability};
pub use memory::MemoryHandoffStore;

/// "What path is active right now", as seen by other views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffRecord {
    pub primary_id: NodeId,
    pub display_name: String,
    pub path: Path,
}

impl HandoffRecord {
    pub fn new(primary_id: NodeId, display_name: impl Into<String>, path: Path) -> Self {
        Self { primary_id, display_name: display_name.into(), path }
    }
}

/// A single named slot holding at most one [`HandoffRecord`].
pub trait HandoffStore: Send + Sync {
    /// Replace any existing record.
    fn publish(&self, record: HandoffRecord) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;

    fn read(&self) -> Result<Option<HandoffRecord>, StoreError>;

    /// Like [`read`](Self::read), but a failing backend reads as absent.
    fn read_or_absent(&self) -> Option<HandoffRecord> {
        match self.read() {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "handoff unreadable; treating as absent");
                None
            }
        }
    }
}

impl fmt::Debug for dyn HandoffStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HandoffStore")
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    SymlinkRefused { path: PathBuf },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::SymlinkRefused { .. } => None,
        }
    }
}
