// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::{HandoffRecord, HandoffStore, StoreError};

const HANDOFF_FILENAME: &str = "narrative-handoff.json";
const SESSION_FILENAME: &str = "narrative-session.json";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Temp file plus atomic rename, no fsync.
    #[default]
    BestEffort,

    /// Also fsync the file and (on unix) its directory. Exact guarantees are
    /// filesystem-dependent.
    Durable,
}

/// What to do with a handoff left over from a previous run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StartupPolicy {
    /// Keep the handoff if the previous session is still marked active; wipe it otherwise.
    #[default]
    Resume,
    /// Always start from an empty slot.
    Wipe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    pub session_was_active: bool,
    pub wiped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SessionFlag {
    state: String,
}

const SESSION_ACTIVE: &str = "active";

/// File-backed handoff slot rooted at a directory.
#[derive(Debug, Clone)]
pub struct HandoffFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl HandoffFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), durability: WriteDurability::default() }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn handoff_path(&self) -> PathBuf {
        self.root.join(HANDOFF_FILENAME)
    }

    pub fn session_path(&self) -> PathBuf {
        self.root.join(SESSION_FILENAME)
    }

    /// Apply `policy` to a leftover handoff and mark the session active.
    pub fn start(&self, policy: StartupPolicy) -> Result<StartupReport, StoreError> {
        let session_was_active = self.is_session_active()?;
        let wipe = match policy {
            StartupPolicy::Wipe => true,
            StartupPolicy::Resume => !session_was_active,
        };

        let wiped = wipe && remove_if_exists(&self.handoff_path())?;
        if wiped {
            tracing::info!(root = ?self.root, ?policy, "stale handoff wiped at startup");
        }

        self.mark_session_active()?;
        Ok(StartupReport { session_was_active, wiped })
    }

    pub fn is_session_active(&self) -> Result<bool, StoreError> {
        let Some(flag) = read_json::<SessionFlag>(&self.session_path())? else {
            return Ok(false);
        };
        Ok(flag.state == SESSION_ACTIVE)
    }

    pub fn mark_session_active(&self) -> Result<(), StoreError> {
        let flag = SessionFlag { state: SESSION_ACTIVE.to_owned() };
        self.write_json(&self.session_path(), &flag)
    }

    /// Drop the session flag. The handoff itself is left for the next startup policy.
    pub fn end_session(&self) -> Result<(), StoreError> {
        remove_if_exists(&self.session_path()).map(|_| ())
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
        json.push('\n');
        write_atomic(&self.root, path, json.as_bytes(), self.durability)
    }
}

impl HandoffStore for HandoffFolder {
    fn publish(&self, record: HandoffRecord) -> Result<(), StoreError> {
        self.write_json(&self.handoff_path(), &record)?;
        tracing::info!(primary_id = %record.primary_id, path = %record.path, "handoff published");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if remove_if_exists(&self.handoff_path())? {
            tracing::info!("handoff cleared");
        }
        Ok(())
    }

    fn read(&self) -> Result<Option<HandoffRecord>, StoreError> {
        read_json(&self.handoff_path())
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })
}

/// Returns whether a file was actually removed.
fn remove_if_exists(path: &Path) -> Result<bool, StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StoreError::Io { path: path.to_path_buf(), source }),
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root)
        .map_err(|source| StoreError::Io { path: root.to_path_buf(), source })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused { path: path.to_path_buf() });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    }

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent or file name"),
        });
    };

    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let tmp_path =
        parent.join(format!(".narrative.tmp.{}.{}", file_name.to_string_lossy(), nanos));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;

    file.write_all(contents)
        .map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io { path: tmp_path.clone(), source })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io { path: path.to_path_buf(), source });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent)
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
            dir.sync_all()
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
