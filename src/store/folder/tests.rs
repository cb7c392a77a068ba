// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{HandoffFolder, StartupPolicy, StartupReport, WriteDurability};
use crate::model::{NodeId, Path};
use crate::store::{HandoffRecord, HandoffStore, StoreError};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("narrative-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct FolderCtx {
    _tmp: TempDir,
    folder: HandoffFolder,
}

#[fixture]
fn ctx() -> FolderCtx {
    let tmp = TempDir::new("handoff-folder");
    // A not-yet-existing subdirectory: the first write must create it.
    let folder = HandoffFolder::new(tmp.path().join("store"));
    FolderCtx { _tmp: tmp, folder }
}

fn record() -> HandoffRecord {
    let path: Path = ["macro_ai", "sector_semi", "theme_hbm", "stock_sk"]
        .iter()
        .map(|id| NodeId::new(id).expect("node id"))
        .collect();
    HandoffRecord::new(NodeId::new("stock_sk").expect("node id"), "SK hynix", path)
}

#[rstest]
fn missing_file_reads_absent(ctx: FolderCtx) {
    assert_eq!(ctx.folder.read().expect("read"), None);
    assert!(!ctx.folder.is_session_active().expect("session flag"));
}

#[rstest]
#[case::best_effort(WriteDurability::BestEffort)]
#[case::durable(WriteDurability::Durable)]
fn publish_then_read_round_trips(ctx: FolderCtx, #[case] durability: WriteDurability) {
    let folder = ctx.folder.clone().with_durability(durability);
    folder.publish(record()).expect("publish");

    assert_eq!(folder.read().expect("read"), Some(record()));

    let raw = std::fs::read_to_string(folder.handoff_path()).expect("raw file");
    assert!(raw.ends_with('\n'));
    assert!(raw.contains("\"primaryId\": \"stock_sk\""), "{raw}");
}

#[rstest]
fn clear_removes_file_and_is_idempotent(ctx: FolderCtx) {
    ctx.folder.publish(record()).expect("publish");
    ctx.folder.clear().expect("clear");
    assert!(!ctx.folder.handoff_path().exists());
    ctx.folder.clear().expect("clear again");
    assert_eq!(ctx.folder.read_or_absent(), None);
}

#[rstest]
fn malformed_file_is_a_json_error_but_reads_absent(ctx: FolderCtx) {
    std::fs::create_dir_all(ctx.folder.root()).expect("root");
    std::fs::write(ctx.folder.handoff_path(), "{ not json").expect("write garbage");

    let err = ctx.folder.read().expect_err("malformed");
    assert!(matches!(err, StoreError::Json { .. }), "{err:?}");
    assert_eq!(ctx.folder.read_or_absent(), None);
}

#[rstest]
fn resume_keeps_handoff_of_an_active_session(ctx: FolderCtx) {
    let first = ctx.folder.start(StartupPolicy::Resume).expect("first start");
    assert_eq!(first, StartupReport { session_was_active: false, wiped: false });

    ctx.folder.publish(record()).expect("publish");
    let second = ctx.folder.start(StartupPolicy::Resume).expect("second start");
    assert_eq!(second, StartupReport { session_was_active: true, wiped: false });
    assert_eq!(ctx.folder.read().expect("read"), Some(record()));
}

#[rstest]
fn resume_wipes_handoff_after_the_session_ended(ctx: FolderCtx) {
    ctx.folder.start(StartupPolicy::Resume).expect("start");
    ctx.folder.publish(record()).expect("publish");
    ctx.folder.end_session().expect("end session");

    let report = ctx.folder.start(StartupPolicy::Resume).expect("restart");
    assert_eq!(report, StartupReport { session_was_active: false, wiped: true });
    assert_eq!(ctx.folder.read().expect("read"), None);
    assert!(ctx.folder.is_session_active().expect("flag"));
}

#[rstest]
fn wipe_policy_always_clears(ctx: FolderCtx) {
    ctx.folder.start(StartupPolicy::Resume).expect("start");
    ctx.folder.publish(record()).expect("publish");

    let report = ctx.folder.start(StartupPolicy::Wipe).expect("fresh start");
    assert!(report.wiped);
    assert_eq!(ctx.folder.read().expect("read"), None);
}

#[cfg(unix)]
#[rstest]
fn publish_refuses_symlinked_target(ctx: FolderCtx) {
    std::fs::create_dir_all(ctx.folder.root()).expect("root");
    let elsewhere = ctx.folder.root().join("elsewhere.json");
    std::fs::write(&elsewhere, "{}").expect("target");
    std::os::unix::fs::symlink(&elsewhere, ctx.folder.handoff_path()).expect("symlink");

    let err = ctx.folder.publish(record()).expect_err("symlink");
    assert!(matches!(err, StoreError::SymlinkRefused { .. }), "{err:?}");
    assert_eq!(std::fs::read_to_string(&elsewhere).expect("untouched"), "{}");
}
